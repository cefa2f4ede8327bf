//! Application error kinds and their HTTP status mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable identifier for each error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AuthenticationFailed,
    WrongInput,
    NotFound,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthenticationFailed => "authentication_failed",
            ErrorCode::WrongInput => "wrong_input",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Internal => "internal",
        }
    }
}

/// Errors surfaced while validating, parsing or forwarding a webhook.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid request signature
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Malformed request payload
    #[error("wrong input: {0}")]
    WrongInput(String),

    /// Unrecognized event type
    #[error("not found: {0}")]
    NotFound(String),

    /// Validation, serialization, transport or event bus failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::AuthenticationFailed(_) => ErrorCode::AuthenticationFailed,
            AppError::WrongInput(_) => ErrorCode::WrongInput,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::AuthenticationFailed(m)
            | AppError::WrongInput(m)
            | AppError::NotFound(m)
            | AppError::Internal(m) => m,
        }
    }

    /// HTTP status returned to the webhook caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ErrorCode::WrongInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub status: &'static str,
    pub message: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            status: self.code().as_str(),
            message: self.message(),
        });
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::AuthenticationFailed("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::WrongInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_and_message() {
        let err = AppError::NotFound("Unknown event".to_string());
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Unknown event");
        assert_eq!(err.to_string(), "not found: Unknown event");
    }

    #[test]
    fn test_into_response_uses_mapped_status() {
        let response = AppError::WrongInput("bad json".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
