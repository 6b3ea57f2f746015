//! Client for the TorchServe inference API (default port 8080).
//!
//! Prediction and explanation requests carry their payloads as multipart
//! file parts, never as JSON; the response is whatever JSON the model's
//! handler produces.

use std::fmt;

use serde_json::Value;

use crate::client::{versioned_path, ApiClient, ClientConfig};
use crate::error::Result;
use crate::http::{FilePart, HttpMethod};
use crate::transport::{ReqwestTransport, Transport};

pub const DEFAULT_INFERENCE_PORT: u16 = 8080;

/// Client for running predictions and explanations against deployed models.
pub struct InferenceClient {
    api: ApiClient,
}

impl fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceClient")
            .field("base_url", &self.api.base_url())
            .finish()
    }
}

impl InferenceClient {
    /// Connect to the inference API on the default port.
    ///
    /// With no explicit base URL, `TORCHSERVE_URL` and then
    /// `http://localhost` are used.
    pub fn new(base_url: Option<&str>) -> Self {
        Self::with_port(base_url, DEFAULT_INFERENCE_PORT)
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

    /// `OPTIONS /` — the inference API's OpenAPI description.
    pub fn api_description(&self) -> Result<Value> {
        self.api
            .perform_request(HttpMethod::Options, "/", None, &[], None)
    }

    /// `GET /ping` — the server's health status.
    pub fn health_check(&self) -> Result<Value> {
        self.api
            .perform_request(HttpMethod::Get, "/ping", None, &[], None)
    }

    /// `POST /predictions/{name}[/{version}]` — run inference.
    ///
    /// `data` is a sequence of named byte payloads (conventionally all named
    /// `data`); an absent version targets the model's default version.
    pub fn predict(
        &self,
        model_name: &str,
        data: &[FilePart],
        version: Option<&str>,
    ) -> Result<Value> {
        let endpoint = versioned_path("predictions", model_name, version);
        self.api
            .perform_request(HttpMethod::Post, &endpoint, None, &[], Some(data))
    }

    /// `POST /explanations/{name}` — run the model's explainer.
    pub fn explain(&self, model_name: &str, data: &[FilePart]) -> Result<Value> {
        let endpoint = format!("/explanations/{model_name}");
        self.api
            .perform_request(HttpMethod::Post, &endpoint, None, &[], Some(data))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::Error;
    use crate::http::HttpResponse;

    #[derive(Debug, Clone)]
    struct Recorded {
        method: HttpMethod,
        url: String,
        part_names: Option<Vec<String>>,
    }

    struct FakeTransport {
        recorded: Rc<RefCell<Vec<Recorded>>>,
        status: u16,
        body: String,
    }

    impl Transport for FakeTransport {
        fn request(
            &self,
            method: HttpMethod,
            url: &str,
            _body: Option<&Value>,
            _query: &[(String, String)],
            files: Option<&[FilePart]>,
        ) -> Result<HttpResponse> {
            self.recorded.borrow_mut().push(Recorded {
                method,
                url: url.to_string(),
                part_names: files.map(|parts| {
                    parts.iter().map(|part| part.name.clone()).collect()
                }),
            });
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn client_with(status: u16, body: &str) -> (InferenceClient, Rc<RefCell<Vec<Recorded>>>) {
        let recorded = Rc::new(RefCell::new(Vec::new()));
        let transport = FakeTransport {
            recorded: Rc::clone(&recorded),
            status,
            body: body.to_string(),
        };
        let config = ClientConfig {
            base_url: "http://localhost".to_string(),
            port: DEFAULT_INFERENCE_PORT,
        };
        let client = InferenceClient::with_transport(config, Box::new(transport));
        (client, recorded)
    }

    fn ok_client() -> (InferenceClient, Rc<RefCell<Vec<Recorded>>>) {
        client_with(200, r#"{"status":"ok"}"#)
    }

    #[test]
    fn health_check_pings_the_server() {
        let (client, recorded) = ok_client();
        client.health_check().unwrap();

        let req = recorded.borrow()[0].clone();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/ping");
        assert!(req.part_names.is_none());
    }

    #[test]
    fn api_description_uses_options_on_root() {
        let (client, recorded) = ok_client();
        client.api_description().unwrap();

        let req = recorded.borrow()[0].clone();
        assert_eq!(req.method, HttpMethod::Options);
        assert_eq!(req.url, "http://localhost:8080/");
    }

    #[test]
    fn predict_posts_parts_to_versionless_endpoint() {
        let (client, recorded) = ok_client();
        let data = vec![
            FilePart::new("data", b"first".to_vec()),
            FilePart::new("data", b"second".to_vec()),
        ];
        client.predict("resnet", &data, None).unwrap();

        let req = recorded.borrow()[0].clone();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/predictions/resnet");
        assert_eq!(
            req.part_names,
            Some(vec!["data".to_string(), "data".to_string()])
        );
    }

    #[test]
    fn predict_with_version_appends_path_segment() {
        let (client, recorded) = ok_client();
        let data = vec![FilePart::new("data", b"bytes".to_vec())];
        client.predict("resnet", &data, Some("2")).unwrap();

        assert_eq!(
            recorded.borrow()[0].url,
            "http://localhost:8080/predictions/resnet/2"
        );
    }

    #[test]
    fn explain_posts_to_explanations_endpoint() {
        let (client, recorded) = ok_client();
        let data = vec![FilePart::new("data", b"bytes".to_vec())];
        client.explain("resnet", &data).unwrap();

        let req = recorded.borrow()[0].clone();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/explanations/resnet");
    }

    #[test]
    fn model_not_found_surfaces_as_request_failed() {
        let (client, _) = client_with(404, r#"{"code":404}"#);
        let data = vec![FilePart::new("data", b"bytes".to_vec())];
        let err = client.predict("missing", &data, None).unwrap_err();
        assert!(matches!(err, Error::RequestFailed { status: 404, .. }));
    }

    #[test]
    fn non_json_success_body_is_a_decode_error() {
        let (client, _) = client_with(200, "plain text");
        let err = client.health_check().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
