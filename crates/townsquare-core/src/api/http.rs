//! HTTP client bound to the community API base address.
//!
//! Every service goes through [`HttpClient`]. It resolves paths against the
//! base address, merges headers over the JSON default, and sorts every
//! outcome into one of: a parsed success, a server rejection, or no response
//! at all.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::multipart::MultipartForm;

// ============================================================================
// Constants
// ============================================================================

/// Base address used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Maximum length for error response bodies in log lines
const MAX_ERROR_BODY_LENGTH: usize = 500;

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// A 2xx response. `body` is `Value::Null` when the server sent nothing.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let status = self.status;
        serde_json::from_value(self.body).map_err(|source| HttpError::Decode { status, source })
    }
}

/// Payload of a rejected request.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Raw(String),
}

impl ErrorBody {
    fn parse(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Raw(text),
        }
    }

    /// The server's `error` field, when present and non-empty.
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorBody::Json(value) => value
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty()),
            ErrorBody::Raw(_) => None,
        }
    }

    /// Truncated rendering, safe to put in a log line.
    pub fn summary(&self) -> String {
        let text = match self {
            ErrorBody::Json(value) => value.to_string(),
            ErrorBody::Raw(text) => text.clone(),
        };
        if text.len() <= MAX_ERROR_BODY_LENGTH {
            return text;
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &text[..cut], text.len())
    }
}

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("No response from server: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("Server rejected request with status {status}")]
    Rejected { status: StatusCode, body: ErrorBody },

    #[error("Response with status {status} is not valid JSON")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// ============================================================================
// Client
// ============================================================================

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    origin: String,
    default_headers: HeaderMap,
}

impl HttpClient {
    /// Client with no request timeout. Callers that want one race the
    /// operation against a timer, or use [`HttpClient::with_timeout`].
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Self::build(base_url, Some(timeout))
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("Invalid API base address: {}", base_url))?;
        if parsed.cannot_be_a_base() {
            anyhow::bail!("API base address cannot be used as a base: {}", base_url);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            origin: parsed.origin().ascii_serialization(),
            default_headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path. `"/events"` and `"events"` are equivalent.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Full URL for a server-relative asset such as an uploaded image.
    ///
    /// Assets are served from the origin, outside the API prefix. Absolute
    /// URLs pass through unchanged.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.origin, path.trim_start_matches('/'))
    }

    /// Defaults overlaid with `extra`; entries in `extra` win.
    fn merged_headers(&self, extra: Option<HeaderMap>) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        if let Some(extra) = extra {
            for (name, value) in extra.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }
        headers
    }

    pub async fn get(&self, path: &str, headers: Option<HeaderMap>) -> Result<HttpResponse, HttpError> {
        self.send(Method::GET, path, RequestBody::Empty, headers).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: RequestBody,
        headers: Option<HeaderMap>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(Method::POST, path, body, headers).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: RequestBody,
        headers: Option<HeaderMap>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(Method::PUT, path, body, headers).await
    }

    pub async fn delete(&self, path: &str, headers: Option<HeaderMap>) -> Result<HttpResponse, HttpError> {
        self.send(Method::DELETE, path, RequestBody::Empty, headers).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        headers: Option<HeaderMap>,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.endpoint(path);
        let mut headers = self.merged_headers(headers);

        let request = self.client.request(method.clone(), &url);
        let request = match body {
            RequestBody::Empty => request.headers(headers),
            RequestBody::Json(value) => request.headers(headers).json(&value),
            RequestBody::Multipart(form) => {
                // The multipart builder supplies its own boundary content type.
                headers.remove(header::CONTENT_TYPE);
                request.headers(headers).multipart(form.to_form()?)
            }
        };

        debug!(%method, url = %url, "Sending request");

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                HttpError::InvalidRequest(e.to_string())
            } else {
                warn!(%method, url = %url, error = %e, "No response from server");
                HttpError::Unreachable(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(HttpError::Unreachable)?;

        if !status.is_success() {
            let body = ErrorBody::parse(text);
            warn!(%method, url = %url, %status, body = %body.summary(), "Request rejected");
            return Err(HttpError::Rejected { status, body });
        }

        debug!(%method, url = %url, %status, "Response received");

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|source| HttpError::Decode { status, source })?
        };

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::multipart::ImageUpload;
    use wiremock::matchers::{body_json, header as header_is, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::new(&format!("{}/api/", server.uri())).expect("client")
    }

    #[test]
    fn test_endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:3000/api/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.endpoint("/events"), "http://localhost:3000/api/events");
        assert_eq!(client.endpoint("events/myevents"), "http://localhost:3000/api/events/myevents");
    }

    #[test]
    fn test_asset_url_uses_origin() {
        let client = HttpClient::new("http://10.0.0.185:3000/api").expect("client");
        assert_eq!(
            client.asset_url("/uploads/pic.jpg"),
            "http://10.0.0.185:3000/uploads/pic.jpg"
        );
        assert_eq!(
            client.asset_url("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(HttpClient::new("not a url").is_err());
    }

    #[test]
    fn test_error_body_summary_truncates() {
        let body = ErrorBody::Raw("x".repeat(MAX_ERROR_BODY_LENGTH + 10));
        let summary = body.summary();
        assert!(summary.contains("truncated"));
        assert!(summary.contains(&format!("{} total bytes", MAX_ERROR_BODY_LENGTH + 10)));
    }

    #[test]
    fn test_error_body_message_requires_string() {
        assert_eq!(
            ErrorBody::Json(serde_json::json!({"error": "Nope"})).message(),
            Some("Nope")
        );
        assert_eq!(ErrorBody::Json(serde_json::json!({"error": 42})).message(), None);
        assert_eq!(ErrorBody::Json(serde_json::json!({"error": ""})).message(), None);
        assert_eq!(ErrorBody::Raw("error".to_string()).message(), None);
    }

    #[tokio::test]
    async fn test_get_parses_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .and(header_is("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"_id": "1"}])))
            .mount(&server)
            .await;

        let response = client_for(&server).get("/events", None).await.expect("success");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body[0]["_id"], "1");
    }

    #[tokio::test]
    async fn test_slow_response_without_timeout_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let response = client_for(&server).get("/events", None).await.expect("success");
        assert_eq!(response.status, StatusCode::OK);

        let impatient =
            HttpClient::with_timeout(&format!("{}/api", server.uri()), Duration::from_millis(50))
                .expect("client");
        let err = impatient.get("/events", None).await.unwrap_err();
        assert!(matches!(err, HttpError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_caller_headers_win() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/raw"))
            .and(header_is("Content-Type", "text/plain"))
            .and(header_is("Authorization", "tok"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut extra = HeaderMap::new();
        extra.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        extra.insert(header::AUTHORIZATION, HeaderValue::from_static("tok"));

        let response = client_for(&server)
            .post("raw", RequestBody::Empty, Some(extra))
            .await
            .expect("success");
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_null());
    }

    #[tokio::test]
    async fn test_json_body_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/thing"))
            .and(body_json(serde_json::json!({"a": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .put("/thing", RequestBody::Json(serde_json::json!({"a": 1})), None)
            .await
            .expect("success");
        assert_eq!(response.body["ok"], true);
    }

    #[tokio::test]
    async fn test_rejected_with_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .post("/auth/login", RequestBody::Json(serde_json::json!({})), None)
            .await
            .expect_err("rejected");
        match err {
            HttpError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body.message(), Some("Invalid credentials"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_with_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/events/9"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = client_for(&server).delete("/events/9", None).await.expect_err("rejected");
        match err {
            HttpError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, ErrorBody::Raw("Internal Server Error".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_with_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get("/html", None).await.expect_err("decode");
        assert!(matches!(err, HttpError::Decode { status, .. } if status == StatusCode::OK));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let client = HttpClient::new(&format!("http://127.0.0.1:{}/api", port)).expect("client");
        let err = client.get("/events", None).await.expect_err("unreachable");
        assert!(matches!(err, HttpError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_multipart_drops_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/forums"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"_id": "f1"})))
            .mount(&server)
            .await;

        let form = MultipartForm::new()
            .text("title", "Hello")
            .image(Some(ImageUpload::new(vec![1, 2, 3], "pic.jpg")));
        client_for(&server)
            .post("/forums", RequestBody::Multipart(form), None)
            .await
            .expect("success");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        let content_types: Vec<_> = requests[0].headers.get_all("content-type").iter().collect();
        assert_eq!(content_types.len(), 1);
        let content_type = content_types[0].to_str().expect("ascii");
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }
}
