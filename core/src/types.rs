//! Per-operation parameter structs with the server's documented defaults.
//!
//! Optional fields left as `None` are omitted from the request entirely; the
//! backend treats omission, not null, as "use the server-side default".

/// Parameters for `ManagementClient::register_model`.
///
/// Only `url` (the model archive location) is required. Everything else
/// starts at the backend's documented default.
#[derive(Debug, Clone)]
pub struct RegisterModel {
    /// Model archive URL or file name in the server's model store.
    pub url: String,
    /// Registered name; defaults server-side to the archive's manifest name.
    pub model_name: Option<String>,
    pub handler: Option<String>,
    pub runtime: Option<String>,
    pub batch_size: i64,
    pub max_batch_delay: i64,
    pub initial_workers: i64,
    pub synchronous: bool,
    pub response_timeout: i64,
}

impl RegisterModel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model_name: None,
            handler: None,
            runtime: None,
            batch_size: 1,
            max_batch_delay: 100,
            initial_workers: 0,
            synchronous: false,
            response_timeout: 120,
        }
    }
}

/// Parameters for `ManagementClient::scale_workers`.
///
/// `max_worker` falls back to `min_worker` when unset. `synchronous` and
/// `timeout` are interpreted server-side; the client never waits on them.
#[derive(Debug, Clone)]
pub struct ScaleWorkers {
    pub min_worker: i64,
    pub max_worker: Option<i64>,
    pub synchronous: bool,
    pub timeout: i64,
}

impl Default for ScaleWorkers {
    fn default() -> Self {
        Self {
            min_worker: 1,
            max_worker: None,
            synchronous: false,
            timeout: -1,
        }
    }
}

/// Parameters for `ManagementClient::list_models`.
#[derive(Debug, Clone)]
pub struct ListModels {
    pub limit: i64,
    /// Pagination cursor from a previous listing; omitted when `None`.
    pub next_page_token: Option<String>,
}

impl Default for ListModels {
    fn default() -> Self {
        Self {
            limit: 100,
            next_page_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_model_defaults_match_the_server_documentation() {
        let opts = RegisterModel::new("squeezenet.mar");
        assert_eq!(opts.url, "squeezenet.mar");
        assert!(opts.model_name.is_none());
        assert_eq!(opts.batch_size, 1);
        assert_eq!(opts.max_batch_delay, 100);
        assert_eq!(opts.initial_workers, 0);
        assert!(!opts.synchronous);
        assert_eq!(opts.response_timeout, 120);
    }

    #[test]
    fn scale_workers_defaults() {
        let opts = ScaleWorkers::default();
        assert_eq!(opts.min_worker, 1);
        assert!(opts.max_worker.is_none());
        assert!(!opts.synchronous);
        assert_eq!(opts.timeout, -1);
    }

    #[test]
    fn list_models_defaults() {
        let opts = ListModels::default();
        assert_eq!(opts.limit, 100);
        assert!(opts.next_page_token.is_none());
    }
}
