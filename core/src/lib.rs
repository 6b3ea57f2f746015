//! Synchronous client for the TorchServe management and inference REST APIs.
//!
//! # Overview
//! Two thin clients over one shared request-performing capability:
//! [`ManagementClient`] builds management endpoints (register, scale,
//! describe, list, unregister, set-default) and [`InferenceClient`] builds
//! inference endpoints (ping, predict, explain). Both resolve their base URL
//! from an explicit argument, the `TORCHSERVE_URL` environment variable, or
//! `http://localhost`, and append their API's default port (8081 management,
//! 8080 inference).
//!
//! # Design
//! - Clients are stateless; each call is one independent blocking HTTP
//!   round-trip with no retries and no connection policy of its own.
//! - The HTTP seam is the [`Transport`] trait; [`ReqwestTransport`] is the
//!   default implementation, and tests substitute fakes.
//! - Null-valued optional parameters are stripped before transmission — the
//!   server only understands omission, never explicit null.
//! - Every non-2xx response becomes [`Error::RequestFailed`] with the raw
//!   status and body; responses are returned as untyped [`serde_json::Value`].

pub mod client;
pub mod error;
pub mod http;
pub mod inference;
pub mod management;
pub mod transport;
pub mod types;

pub use client::{filter_none, ApiClient, ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use http::{FilePart, HttpMethod, HttpResponse};
pub use inference::{InferenceClient, DEFAULT_INFERENCE_PORT};
pub use management::{ManagementClient, DEFAULT_MANAGEMENT_PORT};
pub use transport::{ReqwestTransport, Transport};
pub use types::{ListModels, RegisterModel, ScaleWorkers};
