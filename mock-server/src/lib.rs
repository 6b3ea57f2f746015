//! In-process stand-in for a TorchServe backend.
//!
//! Serves the management API and the inference API as two separate routers
//! over one shared model store, mirroring the real server's two-port layout.
//! Response shapes follow TorchServe's conventions closely enough for client
//! integration tests: status messages for mutations, model description
//! arrays, 404s with `ModelNotFoundException` payloads.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, options, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_VERSION: &str = "1.0";

#[derive(Clone, Debug)]
pub struct Workers {
    pub min: i64,
    pub max: i64,
}

#[derive(Clone, Debug)]
pub struct ModelEntry {
    pub url: String,
    pub default_version: String,
    pub versions: HashMap<String, Workers>,
}

pub type Store = Arc<RwLock<HashMap<String, ModelEntry>>>;

pub fn new_store() -> Store {
    Arc::new(RwLock::new(HashMap::new()))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub url: String,
    pub model_name: Option<String>,
    pub handler: Option<String>,
    pub runtime: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,
    #[serde(default)]
    pub initial_workers: i64,
    #[serde(default)]
    pub synchronous: bool,
}

fn default_batch_size() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ScaleRequest {
    pub min_worker: i64,
    pub max_worker: i64,
    #[serde(default)]
    pub synchronous: bool,
    #[serde(default)]
    pub timeout: i64,
}

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

fn model_not_found(name: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "code": 404,
            "type": "ModelNotFoundException",
            "message": format!("Model not found: {name}"),
        })),
    )
}

fn version_not_found(name: &str, version: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "code": 404,
            "type": "ModelVersionNotFoundException",
            "message": format!("Model version not found: {name}/{version}"),
        })),
    )
}

/// Registered name: explicit `model_name`, else the archive file stem.
pub fn derive_model_name(request: &RegisterRequest) -> String {
    match &request.model_name {
        Some(name) => name.clone(),
        None => {
            let stem = request.url.rsplit('/').next().unwrap_or(&request.url);
            stem.trim_end_matches(".mar").to_string()
        }
    }
}

pub fn management_app(store: Store) -> Router {
    Router::new()
        .route("/", options(management_description))
        .route("/models", get(list_models).post(register_model))
        .route(
            "/models/{name}",
            get(describe_latest).put(scale_latest).delete(unregister_latest),
        )
        .route(
            "/models/{name}/{version}",
            get(describe_version)
                .put(scale_version)
                .delete(unregister_version),
        )
        .route("/models/{name}/{version}/set-default", put(set_default))
        .with_state(store)
}

pub fn inference_app(store: Store) -> Router {
    Router::new()
        .route("/", options(inference_description))
        .route("/ping", get(ping))
        .route("/predictions/{name}", post(predict_latest))
        .route("/predictions/{name}/{version}", post(predict_version))
        .route("/explanations/{name}", post(explain))
        .with_state(store)
}

/// Serve both APIs until either listener fails.
pub async fn run(management: TcpListener, inference: TcpListener) -> Result<(), std::io::Error> {
    use std::future::IntoFuture;

    let store = new_store();
    let management = axum::serve(management, management_app(store.clone())).into_future();
    let inference = axum::serve(inference, inference_app(store)).into_future();
    tokio::try_join!(management, inference)?;
    Ok(())
}

// --- management handlers ---

async fn management_description() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.1",
        "info": { "title": "TorchServe Management API", "version": "1.0" },
    }))
}

async fn register_model(
    State(store): State<Store>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult {
    let name = derive_model_name(&request);
    let workers = Workers {
        min: request.initial_workers,
        max: request.initial_workers,
    };
    let mut models = store.write().await;
    let entry = models.entry(name.clone()).or_insert_with(|| ModelEntry {
        url: request.url.clone(),
        default_version: DEFAULT_VERSION.to_string(),
        versions: HashMap::new(),
    });
    entry.versions.insert(DEFAULT_VERSION.to_string(), workers);

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": format!(
                "Model \"{name}\" Version: {DEFAULT_VERSION} registered with {} initial workers",
                request.initial_workers
            ),
        })),
    ))
}

async fn list_models(
    State(store): State<Store>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let limit: usize = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);
    let start: usize = params
        .get("next_page_token")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let models = store.read().await;
    let mut names: Vec<&String> = models.keys().collect();
    names.sort();

    let page: Vec<Value> = names
        .iter()
        .skip(start)
        .take(limit)
        .map(|name| {
            json!({
                "modelName": name,
                "modelUrl": models[name.as_str()].url,
            })
        })
        .collect();

    let mut body = json!({ "models": page });
    if start + limit < names.len() {
        body["nextPageToken"] = json!((start + limit).to_string());
    }
    Json(body)
}

fn describe_entry(name: &str, entry: &ModelEntry, version: &str) -> Option<Value> {
    let workers = entry.versions.get(version)?;
    Some(json!({
        "modelName": name,
        "modelVersion": version,
        "modelUrl": entry.url,
        "minWorkers": workers.min,
        "maxWorkers": workers.max,
    }))
}

async fn describe(store: &Store, name: &str, version: Option<&str>) -> ApiResult {
    let models = store.read().await;
    let entry = models.get(name).ok_or_else(|| model_not_found(name))?;

    let descriptions: Vec<Value> = match version {
        Some("all") => {
            let mut versions: Vec<&String> = entry.versions.keys().collect();
            versions.sort();
            versions
                .into_iter()
                .filter_map(|v| describe_entry(name, entry, v))
                .collect()
        }
        Some(version) => vec![describe_entry(name, entry, version)
            .ok_or_else(|| version_not_found(name, version))?],
        None => vec![describe_entry(name, entry, &entry.default_version)
            .ok_or_else(|| model_not_found(name))?],
    };
    Ok((StatusCode::OK, Json(json!(descriptions))))
}

async fn describe_latest(
    State(store): State<Store>,
    Path(name): Path<String>,
    Query(_params): Query<HashMap<String, String>>,
) -> ApiResult {
    describe(&store, &name, None).await
}

async fn describe_version(
    State(store): State<Store>,
    Path((name, version)): Path<(String, String)>,
    Query(_params): Query<HashMap<String, String>>,
) -> ApiResult {
    describe(&store, &name, Some(&version)).await
}

async fn scale(store: &Store, name: &str, version: Option<&str>, request: ScaleRequest) -> ApiResult {
    let mut models = store.write().await;
    let entry = models.get_mut(name).ok_or_else(|| model_not_found(name))?;
    let version = version.unwrap_or(&entry.default_version).to_string();
    let workers = entry
        .versions
        .get_mut(&version)
        .ok_or_else(|| version_not_found(name, &version))?;
    workers.min = request.min_worker;
    workers.max = request.max_worker;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "status": format!(
                "Processing worker updates for model \"{name}\", version: {version}"
            ),
        })),
    ))
}

async fn scale_latest(
    State(store): State<Store>,
    Path(name): Path<String>,
    Json(request): Json<ScaleRequest>,
) -> ApiResult {
    scale(&store, &name, None, request).await
}

async fn scale_version(
    State(store): State<Store>,
    Path((name, version)): Path<(String, String)>,
    Json(request): Json<ScaleRequest>,
) -> ApiResult {
    scale(&store, &name, Some(&version), request).await
}

async fn unregister(store: &Store, name: &str, version: Option<&str>) -> ApiResult {
    let mut models = store.write().await;
    match version {
        Some(version) => {
            let entry = models.get_mut(name).ok_or_else(|| model_not_found(name))?;
            entry
                .versions
                .remove(version)
                .ok_or_else(|| version_not_found(name, version))?;
            if entry.versions.is_empty() {
                models.remove(name);
            }
        }
        None => {
            models.remove(name).ok_or_else(|| model_not_found(name))?;
        }
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "status": format!("Model \"{name}\" unregistered") })),
    ))
}

async fn unregister_latest(State(store): State<Store>, Path(name): Path<String>) -> ApiResult {
    unregister(&store, &name, None).await
}

async fn unregister_version(
    State(store): State<Store>,
    Path((name, version)): Path<(String, String)>,
) -> ApiResult {
    unregister(&store, &name, Some(&version)).await
}

async fn set_default(
    State(store): State<Store>,
    Path((name, version)): Path<(String, String)>,
) -> ApiResult {
    let mut models = store.write().await;
    let entry = models.get_mut(&name).ok_or_else(|| model_not_found(&name))?;
    if !entry.versions.contains_key(&version) {
        return Err(version_not_found(&name, &version));
    }
    entry.default_version = version.clone();
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": format!(
                "Default version successfully updated for model \"{name}\" to \"{version}\""
            ),
        })),
    ))
}

// --- inference handlers ---

async fn inference_description() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.1",
        "info": { "title": "TorchServe Inference API", "version": "1.0" },
    }))
}

async fn ping() -> Json<Value> {
    Json(json!({ "status": "Healthy" }))
}

/// Drain a multipart body into `(field name, byte count)` summaries.
async fn collect_parts(mut multipart: Multipart) -> Result<Vec<Value>, (StatusCode, Json<Value>)> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": 400, "message": e.to_string() })),
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "code": 400, "message": e.to_string() })),
            )
        })?;
        parts.push(json!({ "name": name, "size": bytes.len() }));
    }
    Ok(parts)
}

async fn predict(
    store: &Store,
    name: &str,
    version: Option<&str>,
    multipart: Multipart,
) -> ApiResult {
    let models = store.read().await;
    let entry = models.get(name).ok_or_else(|| model_not_found(name))?;
    let version = version.unwrap_or(&entry.default_version).to_string();
    if !entry.versions.contains_key(&version) {
        return Err(version_not_found(name, &version));
    }
    drop(models);

    let parts = collect_parts(multipart).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "model": name,
            "version": version,
            "parts": parts,
        })),
    ))
}

async fn predict_latest(
    State(store): State<Store>,
    Path(name): Path<String>,
    multipart: Multipart,
) -> ApiResult {
    predict(&store, &name, None, multipart).await
}

async fn predict_version(
    State(store): State<Store>,
    Path((name, version)): Path<(String, String)>,
    multipart: Multipart,
) -> ApiResult {
    predict(&store, &name, Some(&version), multipart).await
}

async fn explain(
    State(store): State<Store>,
    Path(name): Path<String>,
    multipart: Multipart,
) -> ApiResult {
    let models = store.read().await;
    if !models.contains_key(&name) {
        return Err(model_not_found(&name));
    }
    drop(models);

    let parts = collect_parts(multipart).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "model": name,
            "explanations": parts,
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(url: &str, model_name: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            url: url.to_string(),
            model_name: model_name.map(str::to_string),
            handler: None,
            runtime: None,
            batch_size: 1,
            initial_workers: 0,
            synchronous: false,
        }
    }

    #[test]
    fn model_name_prefers_explicit_name() {
        let request = register_request("squeezenet.mar", Some("squeeze"));
        assert_eq!(derive_model_name(&request), "squeeze");
    }

    #[test]
    fn model_name_falls_back_to_archive_stem() {
        let request = register_request("https://example.com/store/squeezenet.mar", None);
        assert_eq!(derive_model_name(&request), "squeezenet");
    }

    #[test]
    fn register_request_fills_serde_defaults() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"url":"m.mar"}"#).expect("minimal register body");
        assert_eq!(request.batch_size, 1);
        assert_eq!(request.initial_workers, 0);
        assert!(!request.synchronous);
    }

    #[test]
    fn scale_request_requires_worker_bounds() {
        let result: Result<ScaleRequest, _> = serde_json::from_str(r#"{"synchronous":true}"#);
        assert!(result.is_err());
    }
}
