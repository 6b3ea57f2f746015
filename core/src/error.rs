//! Error types for the TorchServe API clients.
//!
//! # Design
//! Any non-2xx response lands in `RequestFailed` with the raw status code and
//! body for the caller to inspect; the client does not classify 4xx vs 5xx
//! further and never retries. Network-level failures (connection refused,
//! timeout) are reported by the transport as `Transport`.

use thiserror::Error;

/// Errors returned by [`ManagementClient`](crate::ManagementClient) and
/// [`InferenceClient`](crate::InferenceClient) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The transport could not complete the HTTP round-trip.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded as JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
