//! Unified client error model.
//! One enum is shared by the session authority, the inventory API and the CLI,
//! with a stable `code` string per failure and an HTTP-status mapping used when
//! turning backend responses into errors and back.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const AUTHENTICATION_REQUIRED: &str = "authentication_required";
pub const FORBIDDEN: &str = "forbidden";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    UserInput { code: String, message: String },
    NotFound { code: String, message: String },
    Auth { code: String, message: String },
    Storage { code: String, message: String },
    Transport { code: String, message: String },
    Decode { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Storage { code, .. }
            | AppError::Transport { code, .. }
            | AppError::Decode { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Storage { message, .. }
            | AppError::Transport { message, .. }
            | AppError::Decode { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user<S: Into<String>>(code: S, msg: S) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn storage<S: Into<String>>(code: S, msg: S) -> Self { AppError::Storage { code: code.into(), message: msg.into() } }
    pub fn transport<S: Into<String>>(code: S, msg: S) -> Self { AppError::Transport { code: code.into(), message: msg.into() } }
    pub fn decode<S: Into<String>>(code: S, msg: S) -> Self { AppError::Decode { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// The error `authenticated_fetch` fails with after a 401.
    pub fn authentication_required() -> Self {
        AppError::auth(AUTHENTICATION_REQUIRED, "Authentication required")
    }

    pub fn forbidden(action: &str) -> Self {
        AppError::Auth { code: FORBIDDEN.into(), message: format!("current role may not {}", action) }
    }

    pub fn is_authentication_required(&self) -> bool {
        matches!(self, AppError::Auth { code, .. } if code == AUTHENTICATION_REQUIRED)
    }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::UserInput { .. } => 400,
            AppError::NotFound { .. } => 404,
            AppError::Auth { code, .. } if code == FORBIDDEN => 403,
            AppError::Auth { .. } => 401,
            AppError::Storage { .. } => 503,
            AppError::Transport { .. } => 502,
            AppError::Decode { .. } => 502,
            AppError::Internal { .. } => 500,
        }
    }

    /// Build an error from a non-success backend status and its `detail` text.
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            400 | 409 | 422 => AppError::UserInput { code: format!("http_{}", status), message: detail },
            401 => AppError::authentication_required(),
            403 => AppError::Auth { code: FORBIDDEN.into(), message: detail },
            404 => AppError::NotFound { code: "not_found".into(), message: detail },
            _ => AppError::Internal { code: format!("http_{}", status), message: detail },
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode { code: "decode_error".into(), message: err.to_string() }
        } else {
            AppError::Transport { code: "transport_error".into(), message: err.to_string() }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode { code: "decode_error".into(), message: err.to_string() }
    }
}

impl From<crate::identity::StoreError> for AppError {
    fn from(err: crate::identity::StoreError) -> Self {
        AppError::Storage { code: "storage_error".into(), message: err.to_string() }
    }
}
