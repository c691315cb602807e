//! Unified application error model and mapping helpers.
//! This module provides a common error enum used across the session layer,
//! the API gateway and the resource services, along with helper constructors
//! and an HTTP status mapping for callers that surface failures to a UI.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// Client-side validation failure; rejected before any network call.
    Validation { code: String, message: String },
    /// Missing, expired or malformed session; forces a clear + login redirect.
    Auth { code: String, message: String },
    /// The server could not be reached at all (DNS, connect, timeout).
    Transport { code: String, message: String },
    /// The server answered with a non-success status. `status` is the HTTP
    /// status; `message` is the server's own message where one was provided.
    Api { status: u16, code: String, message: String },
    /// Durable storage read/write failure (file backend).
    Storage { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Validation { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Transport { code, .. }
            | AppError::Api { code, .. }
            | AppError::Storage { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Transport { message, .. }
            | AppError::Api { message, .. }
            | AppError::Storage { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn validation<S: Into<String>>(code: S, msg: S) -> Self { AppError::Validation { code: code.into(), message: msg.into() } }
    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn transport<S: Into<String>>(code: S, msg: S) -> Self { AppError::Transport { code: code.into(), message: msg.into() } }
    pub fn api<S: Into<String>>(status: u16, code: S, msg: S) -> Self { AppError::Api { status, code: code.into(), message: msg.into() } }
    pub fn storage<S: Into<String>>(code: S, msg: S) -> Self { AppError::Storage { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// HTTP status of the failure as seen by the caller. Api errors carry the
    /// server's own status; local failures map to conventional codes.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Validation { .. } => 400,
            AppError::Auth { .. } => 401,
            AppError::Transport { .. } => 503,
            AppError::Api { status, .. } => *status,
            AppError::Storage { .. } => 500,
            AppError::Internal { .. } => 500,
        }
    }

    /// True when the failure means the server rejected the request, as
    /// opposed to the request never reaching a server.
    pub fn is_application(&self) -> bool {
        matches!(self, AppError::Api { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport { .. })
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<crate::storage::StorageError> for AppError {
    fn from(err: crate::storage::StorageError) -> Self {
        AppError::Storage { code: "storage_error".into(), message: err.to_string() }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // A response was produced but decoding it failed -> application-side;
        // anything else never reached a server.
        if err.is_decode() {
            AppError::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(500),
                code: "bad_response".into(),
                message: err.to_string(),
            }
        } else {
            AppError::Transport { code: "transport_error".into(), message: err.to_string() }
        }
    }
}
