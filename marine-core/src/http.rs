//! HTTP seam used by the forecast client.
//!
//! The client only ever issues a single GET and needs to tell "the service answered
//! with an error status" apart from every other failure. [`HttpRequester`] captures
//! exactly that, so tests can swap in a fake without a network.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A GET request with query parameters and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into(), query: Vec::new(), headers: Vec::new() }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    /// The remote service answered, but with a non-success status.
    #[error("request failed with status code {status}")]
    Status { status: u16, body: Value },

    /// No usable response was received.
    #[error("transport failure")]
    Transport(#[source] BoxError),

    /// The service answered successfully but the body was not JSON.
    #[error("invalid JSON response body")]
    Decode(#[from] serde_json::Error),
}

impl HttpError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        HttpError::Transport(err.into())
    }
}

#[async_trait]
pub trait HttpRequester: Send + Sync + Debug {
    async fn get_json(&self, request: &HttpRequest) -> Result<Value, HttpError>;
}

/// [`HttpRequester`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestRequester {
    http: Client,
}

impl ReqwestRequester {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let http = Client::builder().timeout(timeout).build().map_err(HttpError::transport)?;
        Ok(Self { http })
    }

    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpRequester for ReqwestRequester {
    async fn get_json(&self, request: &HttpRequest) -> Result<Value, HttpError> {
        let mut builder = self.http.get(&request.url).query(&request.query);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let res = builder.send().await.map_err(HttpError::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(HttpError::transport)?;

        if !status.is_success() {
            return Err(HttpError::Status { status: status.as_u16(), body: parse_error_body(body) });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Error bodies are kept as JSON when possible, otherwise as a JSON string.
fn parse_error_body(body: String) -> Value {
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_json_sends_query_and_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .and(query_param("lat", "1.5"))
            .and(header("Authorization", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hours": [] })))
            .mount(&mock_server)
            .await;

        let request = HttpRequest::get(format!("{}/weather/point", mock_server.uri()))
            .query("lat", 1.5)
            .header("Authorization", "secret");

        let body = ReqwestRequester::new().get_json(&request).await.unwrap();
        assert_eq!(body, json!({ "hours": [] }));
    }

    #[tokio::test]
    async fn error_status_keeps_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({ "errors": ["Rate limit exceeded"] })),
            )
            .mount(&mock_server)
            .await;

        let request = HttpRequest::get(mock_server.uri());
        let err = ReqwestRequester::new().get_json(&request).await.unwrap_err();

        match err {
            HttpError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, json!({ "errors": ["Rate limit exceeded"] }));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_with_plain_body_becomes_string() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let request = HttpRequest::get(mock_server.uri());
        let err = ReqwestRequester::new().get_json(&request).await.unwrap_err();

        assert!(matches!(
            err,
            HttpError::Status { status: 502, body: Value::String(ref s) } if s == "Bad Gateway"
        ));
    }

    #[tokio::test]
    async fn invalid_success_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let request = HttpRequest::get(mock_server.uri());
        let err = ReqwestRequester::new().get_json(&request).await.unwrap_err();

        assert!(matches!(err, HttpError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let request = HttpRequest::get("http://127.0.0.1:9/weather/point");
        let requester = ReqwestRequester::with_timeout(Duration::from_secs(2)).unwrap();

        let err = requester.get_json(&request).await.unwrap_err();
        assert!(matches!(err, HttpError::Transport(_)));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let request = HttpRequest::get("http://x").header("Authorization", "t");
        assert_eq!(request.header_value("authorization"), Some("t"));
        assert_eq!(request.query_value("lat"), None);
    }
}
