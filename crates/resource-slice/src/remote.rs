//! # Remote Data Client
//!
//! Slices never speak HTTP themselves. They hand a [`RemoteRequest`] to a
//! [`RemoteClient`] and get back a JSON value or a [`SliceError`]. [`HttpClient`] is the
//! production implementation (reqwest); [`MockRemote`](crate::mock::MockRemote) is the
//! in-memory one used by tests.

use crate::error::SliceError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{self, Display};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One request to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RemoteRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The contract slices consume: one request in, one JSON body (or failure) out.
#[async_trait]
pub trait RemoteClient: Send + Sync + 'static {
    async fn request(&self, request: RemoteRequest) -> Result<Value, SliceError>;
}

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub bearer_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            bearer_token: None,
        }
    }
}

/// Error body the backend sends with non-success statuses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    code: Option<String>,
}

/// reqwest-backed [`RemoteClient`].
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self, SliceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| SliceError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, request: &RemoteRequest) -> Result<Url, SliceError> {
        let raw = format!("{}{}", self.base_url, request.path);
        let parsed = if request.params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, &request.params)
        };
        parsed.map_err(|e| SliceError::Validation(format!("invalid url '{}': {}", raw, e)))
    }
}

fn transport_error(err: reqwest::Error) -> SliceError {
    if err.is_timeout() {
        SliceError::Timeout
    } else {
        SliceError::Transport(err.to_string())
    }
}

fn domain_error(status: StatusCode, body: &[u8]) -> SliceError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty() && text.len() <= 512).then_some(text)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
    SliceError::Domain {
        status: status.as_u16(),
        message,
        code: parsed.code,
    }
}

#[async_trait]
impl RemoteClient for HttpClient {
    async fn request(&self, request: RemoteRequest) -> Result<Value, SliceError> {
        let url = self.url(&request)?;
        debug!(method = %request.method, %url, "Sending request");

        let mut builder = self.client.request(request.method.into(), url);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let err = domain_error(status, &bytes);
            warn!(method = %request.method, path = %request.path, status = status.as_u16(), error = %err, "Request rejected");
            return Err(err);
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_prefers_message_field() {
        let err = domain_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"message":"RFC invalido","code":"SAT_RFC"}"#,
        );
        assert_eq!(
            err,
            SliceError::Domain {
                status: 422,
                message: "RFC invalido".to_string(),
                code: Some("SAT_RFC".to_string()),
            }
        );
    }

    #[test]
    fn domain_error_falls_back_to_error_field_then_text() {
        let err = domain_error(StatusCode::CONFLICT, br#"{"error":"already exists"}"#);
        assert!(matches!(err, SliceError::Domain { ref message, .. } if message == "already exists"));

        let err = domain_error(StatusCode::BAD_GATEWAY, b"upstream down");
        assert!(matches!(err, SliceError::Domain { ref message, .. } if message == "upstream down"));

        let err = domain_error(StatusCode::NOT_FOUND, b"");
        assert!(matches!(err, SliceError::Domain { ref message, status: 404, .. } if message == "Not Found"));
    }

    #[test]
    fn url_joins_base_path_and_params() {
        let client = HttpClient::new(HttpConfig {
            base_url: "http://localhost:9000/api/".to_string(),
            ..Default::default()
        })
        .unwrap();
        let request = RemoteRequest::new(Method::Get, "/receivables").with_params(vec![
            ("status".to_string(), "open".to_string()),
            ("pageNumber".to_string(), "1".to_string()),
        ]);
        let url = client.url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/api/receivables?status=open&pageNumber=1"
        );
    }
}
