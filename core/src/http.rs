//! Plain-data HTTP vocabulary shared by the clients and the transport.
//!
//! # Design
//! The clients describe what to send (method, URL, body, query, files) and
//! the [`Transport`](crate::transport::Transport) turns that description into
//! a real round-trip. Responses come back as plain data so status
//! interpretation stays in one place, `ApiClient::perform_request`.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// One named byte payload of a multipart upload.
///
/// The inference API takes request data as a sequence of these rather than a
/// JSON body; the field name (conventionally `data`) is what the serving
/// handler sees.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub name: String,
    pub data: Vec<u8>,
}

impl FilePart {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// An HTTP response described as plain data.
///
/// Returned by the transport regardless of status code; non-2xx handling
/// happens in `ApiClient::perform_request`, not in the transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
