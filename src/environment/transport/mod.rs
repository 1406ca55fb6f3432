//! The request/response seam between the API client and the network.
//!
//! `HttpTransport` talks to the real backend through `reqwest`, the mock
//! transport serves canned responses to tests.

#[cfg(test)]
mod mock;

#[cfg(test)]
pub use mock::MockTransport;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ApiError, ValidationError};

/// Header that carries the auth token
pub const TOKEN_HEADER: &str = "X-Token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the base url, starting with `/`
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request and return the parsed JSON body.
    ///
    /// Non-success statuses are returned as `ApiError::Status`.
    async fn send(&self, request: Request) -> Result<Value, ApiError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: url::Url,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = url::Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("Invalid base url {base_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<url::Url, ApiError> {
        // `Url::join` would drop the base path for absolute paths
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url::Url::parse(&joined).map_err(|e| ApiError::Transport(format!("Invalid url {joined}: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Value, ApiError> {
        let url = self.url(&request.path)?;
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(token) = request.token.as_deref() {
            builder = builder.header(TOKEN_HEADER, token);
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_slice::<ValidationError>(&bytes).ok();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
