//! Shared request-performing capability behind both API clients.
//!
//! # Design
//! `ApiClient` holds the resolved base URL and the transport, and every
//! operation of the management and inference clients funnels through
//! [`ApiClient::perform_request`]: concatenate base URL and endpoint, execute
//! the transport call, fail on non-2xx, decode JSON. The two public clients
//! compose an `ApiClient` rather than inheriting from it, each contributing
//! only its own default port and endpoint builders.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::{FilePart, HttpMethod};
use crate::transport::Transport;

/// Environment variable consulted when no base URL is supplied.
pub const BASE_URL_ENV: &str = "TORCHSERVE_URL";

/// Fallback when neither an argument nor the environment provides a base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// Resolved connection settings for one client.
///
/// `base_url` never carries a trailing slash; the effective URL the client
/// dials is `base_url:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub port: u16,
}

impl ClientConfig {
    /// Resolve from an optional explicit base URL, falling back to the
    /// `TORCHSERVE_URL` environment variable and then to `http://localhost`.
    pub fn new(base_url: Option<&str>, port: u16) -> Self {
        Self::resolve(base_url, std::env::var(BASE_URL_ENV).ok(), port)
    }

    fn resolve(base_url: Option<&str>, env_value: Option<String>, port: u16) -> Self {
        let base_url = base_url
            .map(str::to_string)
            .or(env_value)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            port,
        }
    }

    pub fn effective_url(&self) -> String {
        format!("{}:{}", self.base_url, self.port)
    }
}

/// The shared "perform one request" capability.
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: config.effective_url(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Dispatch one request and decode the JSON response.
    ///
    /// Any non-2xx status becomes [`Error::RequestFailed`] carrying the raw
    /// status and body; nothing is retried or reclassified.
    pub(crate) fn perform_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(String, String)],
        files: Option<&[FilePart]>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(method = method.as_str(), %url, "dispatching request");
        let response = self.transport.request(method, &url, body, query, files)?;
        debug!(method = method.as_str(), %url, status = response.status, "received response");
        if !response.is_success() {
            return Err(Error::RequestFailed {
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(Error::from)
    }
}

/// Drop every null-valued entry of a parameter map.
///
/// The server distinguishes "omitted" from "explicit null", and only omission
/// is representable; every endpoint builder filters its parameters through
/// here before serialization.
pub fn filter_none(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().filter(|(_, v)| !v.is_null()).collect()
}

/// Path for a named resource with an optional version segment.
///
/// An absent version omits the segment entirely (the server treats that as
/// "latest"); no sentinel value is ever substituted.
pub(crate) fn versioned_path(resource: &str, name: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("/{resource}/{name}/{version}"),
        None => format!("/{resource}/{name}"),
    }
}

/// Unwrap a `json!` object literal into its map. Non-object values cannot
/// occur for the parameter literals the endpoint builders construct.
pub(crate) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Render a filtered parameter map as URL query pairs.
pub(crate) fn query_pairs(map: &Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}
