//! Client for the TorchServe management API (default port 8081).
//!
//! Each operation is a thin endpoint builder over
//! [`ApiClient::perform_request`]: assemble the path, filter the parameters,
//! dispatch, return the decoded JSON payload.

use std::fmt;

use serde_json::{json, Value};

use crate::client::{filter_none, object, query_pairs, versioned_path, ApiClient, ClientConfig};
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{ListModels, RegisterModel, ScaleWorkers};

pub const DEFAULT_MANAGEMENT_PORT: u16 = 8081;

/// Client for registering, scaling, and inspecting model deployments.
pub struct ManagementClient {
    api: ApiClient,
}

impl fmt::Debug for ManagementClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementClient")
            .field("base_url", &self.api.base_url())
            .finish()
    }
}

impl ManagementClient {
    /// Connect to the management API on the default port.
    ///
    /// With no explicit base URL, `TORCHSERVE_URL` and then
    /// `http://localhost` are used.
    pub fn new(base_url: Option<&str>) -> Self {
        Self::with_port(base_url, DEFAULT_MANAGEMENT_PORT)
    }

    pub fn with_port(base_url: Option<&str>, port: u16) -> Self {
        Self::with_transport(
            ClientConfig::new(base_url, port),
            Box::new(ReqwestTransport::new()),
        )
    }

    pub fn with_transport(config: ClientConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            api: ApiClient::new(config, transport),
        }
    }

    /// `POST /models` — register a model archive with the server.
    pub fn register_model(&self, opts: &RegisterModel) -> Result<Value> {
        let body = Value::Object(filter_none(object(json!({
            "url": opts.url,
            "model_name": opts.model_name,
            "handler": opts.handler,
            "runtime": opts.runtime,
            "batch_size": opts.batch_size,
            "max_batch_delay": opts.max_batch_delay,
            "initial_workers": opts.initial_workers,
            "synchronous": opts.synchronous,
            "response_timeout": opts.response_timeout,
        }))));
        self.api
            .perform_request(HttpMethod::Post, "/models", Some(&body), &[], None)
    }

    /// `PUT /models/{name}[/{version}]` — change the worker count.
    pub fn scale_workers(
        &self,
        model_name: &str,
        version: Option<&str>,
        opts: &ScaleWorkers,
    ) -> Result<Value> {
        let endpoint = versioned_path("models", model_name, version);
        let body = json!({
            "min_worker": opts.min_worker,
            "max_worker": opts.max_worker.unwrap_or(opts.min_worker),
            "synchronous": opts.synchronous,
            "timeout": opts.timeout,
        });
        self.api
            .perform_request(HttpMethod::Put, &endpoint, Some(&body), &[], None)
    }

    /// `GET /models/{name}[/{version}]` — describe one model.
    ///
    /// Pass `Some("all")` to list every registered version; an absent version
    /// describes the latest. `customized` asks for handler-provided metadata
    /// and is sent only when true.
    pub fn describe_model(
        &self,
        model_name: &str,
        version: Option<&str>,
        customized: bool,
    ) -> Result<Value> {
        let endpoint = versioned_path("models", model_name, version);
        let mut query = Vec::new();
        if customized {
            query.push(("customized".to_string(), "true".to_string()));
        }
        self.api
            .perform_request(HttpMethod::Get, &endpoint, None, &query, None)
    }

    /// `DELETE /models/{name}[/{version}]` — unregister a model.
    pub fn unregister_model(&self, model_name: &str, version: Option<&str>) -> Result<Value> {
        let endpoint = versioned_path("models", model_name, version);
        self.api
            .perform_request(HttpMethod::Delete, &endpoint, None, &[], None)
    }

    /// `GET /models` — page through the registered models.
    pub fn list_models(&self, opts: &ListModels) -> Result<Value> {
        let params = filter_none(object(json!({
            "limit": opts.limit,
            "next_page_token": opts.next_page_token,
        })));
        let query = query_pairs(&params);
        self.api
            .perform_request(HttpMethod::Get, "/models", None, &query, None)
    }

    /// `OPTIONS /` — the management API's OpenAPI description.
    pub fn api_description(&self) -> Result<Value> {
        self.api
            .perform_request(HttpMethod::Options, "/", None, &[], None)
    }

    /// `PUT /models/{name}/{version}/set-default` — pin the default version.
    pub fn set_default_version(&self, model_name: &str, version: &str) -> Result<Value> {
        let endpoint = format!("/models/{model_name}/{version}/set-default");
        self.api
            .perform_request(HttpMethod::Put, &endpoint, None, &[], None)
    }
}
