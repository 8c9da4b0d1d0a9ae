//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"success": false, "message": ..., "error": ...}`; store failures pass
//! the underlying error text through in `error`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No pending intent carries this mobile + code.
    #[error("Invalid cashier code")]
    InvalidCode,

    /// The matching intent is past its expiry.
    #[error("Cashier code expired")]
    CodeExpired,

    /// Lookup found nothing.
    #[error("{0} not found")]
    NotFound(String),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCode | Self::CodeExpired => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (message, error) = match &self {
            Self::Validation(msg) => (msg.clone(), None),
            Self::Store(StoreError::Conflict(msg)) => (msg.clone(), None),
            Self::Store(err) => ("Server error".to_owned(), Some(err.to_string())),
            _ => (self.to_string(), None),
        };

        let body = ErrorBody {
            success: false,
            message,
            error,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
