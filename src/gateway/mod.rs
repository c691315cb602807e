//!
//! goalblog API gateway
//! ---------------------
//! The single chokepoint for outbound HTTP calls to the backend REST API.
//! Requests are JSON in/out; a bearer token is attached when the caller
//! supplies one; bodies are serialized for create/replace methods only.
//! Failures split into two families the caller can tell apart: transport
//! (the server was never reached) and application (the server answered with
//! a non-success status, whose `message` field is surfaced verbatim).

mod upload;

pub use upload::{ImagePayload, MediaUploader, UploadMetadata, UploadResult};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// The four request shapes the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ApiMethod {
    fn as_reqwest(&self) -> reqwest::Method {
        match self {
            ApiMethod::Get => reqwest::Method::GET,
            ApiMethod::Post => reqwest::Method::POST,
            ApiMethod::Put => reqwest::Method::PUT,
            ApiMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Only create/replace carry a serialized body.
    fn takes_body(&self) -> bool {
        matches!(self, ApiMethod::Post | ApiMethod::Put)
    }
}

#[derive(Clone)]
pub struct ApiGateway {
    base: String,
    client: reqwest::Client,
}

impl ApiGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.api_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base, endpoint.trim_start_matches('/'))
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// Non-2xx replies become `AppError::Api` carrying the response body's
    /// `message` field where one is present, a generic fallback otherwise.
    /// A request that never reaches the server becomes `AppError::Transport`.
    pub async fn request(
        &self,
        endpoint: &str,
        method: ApiMethod,
        body: Option<&JsonValue>,
        token: Option<&str>,
    ) -> AppResult<JsonValue> {
        let url = self.url_for(endpoint);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let bearer = format!("Bearer {}", token);
            let value = HeaderValue::from_str(&bearer)
                .map_err(|_| AppError::auth("bad_token", "stored token is not a valid header value"))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut req = self.client.request(method.as_reqwest(), &url).headers(headers);
        if let (Some(body), true) = (body, method.takes_body()) {
            req = req.json(body);
        }

        debug!(target: "goalblog::gateway", "{:?} {}", method, url);
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            // Best-effort parse of the error body for its message field.
            let val: JsonValue = resp.json().await.unwrap_or(JsonValue::Null);
            let message = val
                .get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("request failed: HTTP {}", status));
            return Err(AppError::api(status.as_u16(), "api_error".to_string(), message));
        }
        let val: JsonValue = resp.json().await?;
        Ok(val)
    }

    /// Like `request`, decoding the success body into `T`. Decoding happens
    /// here, at the boundary, so callers never touch loose JSON shapes.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: ApiMethod,
        body: Option<&JsonValue>,
        token: Option<&str>,
    ) -> AppResult<T> {
        let val = self.request(endpoint, method, body, token).await?;
        serde_json::from_value(val)
            .map_err(|e| AppError::api(200, "bad_response".to_string(), format!("unexpected response shape: {}", e)))
    }
}
