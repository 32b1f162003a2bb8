//! Structured error handling for the REST API.
//!
//! Every handler failure funnels into [`AppError`], whose `IntoResponse`
//! implementation is the single place mapping the taxonomy to HTTP status
//! codes and the JSON `{"message": ...}` body.
//! Internal details are logged but never exposed to clients.

use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message sent to clients in place of internal error details.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Application error type with automatic HTTP response conversion.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a not found error for an entity.
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{entity} not found"))
    }

    /// Create an invalid request error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an error for invalid or expired tokens.
    #[must_use]
    pub fn token_invalid() -> Self {
        Self::InvalidRequest("token invalid or expired".to_string())
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref msg) = self {
            error!(error = %msg, "Internal error");
        }

        let body = ErrorBody {
            message: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for the application.
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for converting foreign errors to `AppError::Internal`.
pub trait ResultExt<T> {
    /// Map the error to `AppError::Internal`, keeping `msg` as context.
    ///
    /// # Errors
    /// Returns `AppError::Internal` carrying `msg` and the source error.
    fn internal(self, msg: &'static str) -> AppResult<T>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn internal(self, msg: &'static str) -> AppResult<T> {
        self.map_err(|e| AppError::Internal(format!("{msg}: {e}")))
    }
}

/// Extension trait for Option types.
pub trait OptionExt<T> {
    /// Convert `None` to `AppError::NotFound` for the named entity.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the option is `None`.
    fn or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_helper_formats_correctly() {
        let err = AppError::not_found("Product");
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::invalid("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_sent_to_clients() {
        let err = AppError::Internal("connection reset by peer".into());
        assert_eq!(err.client_message(), INTERNAL_ERROR_MESSAGE);

        let err = AppError::invalid("invalid order item");
        assert_eq!(err.client_message(), "invalid order item");
    }

    #[test]
    fn result_ext_wraps_as_internal() {
        let res: Result<(), &str> = Err("boom");
        let err = res.internal("Failed to hash password").unwrap_err();
        assert!(matches!(err, AppError::Internal(ref m) if m.contains("boom")));
    }
}
