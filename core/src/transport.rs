//! HTTP transport seam and its default `reqwest` implementation.
//!
//! # Design
//! Everything network-shaped sits behind [`Transport`], a single
//! request-performing capability. The clients never see `reqwest` types;
//! tests substitute a recording fake to assert on the requests an operation
//! produces without opening a socket.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::{FilePart, HttpMethod, HttpResponse};

/// Executes one HTTP request and returns the response as plain data.
///
/// Implementations must return `Ok` for *any* HTTP status the server
/// produces; only failures to complete the round-trip at all (connection
/// refused, timeout, malformed URL) are errors. Status interpretation belongs
/// to the caller.
pub trait Transport {
    fn request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
        query: &[(String, String)],
        files: Option<&[FilePart]>,
    ) -> Result<HttpResponse>;
}

/// Default transport over a blocking `reqwest` client.
///
/// JSON bodies are sent with `Content-Type: application/json`; file parts are
/// sent as a `multipart/form-data` form, one field per part.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

impl Transport for ReqwestTransport {
    fn request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
        query: &[(String, String)],
        files: Option<&[FilePart]>,
    ) -> Result<HttpResponse> {
        let mut builder = self.client.request(to_reqwest_method(method), url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(files) = files {
            let mut form = reqwest::blocking::multipart::Form::new();
            for part in files {
                form = form.part(
                    part.name.clone(),
                    reqwest::blocking::multipart::Part::bytes(part.data.clone()),
                );
            }
            builder = builder.multipart(form);
        }

        let response = builder
            .send()
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
