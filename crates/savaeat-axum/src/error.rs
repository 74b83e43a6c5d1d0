//! Axum-specific error types and mappings.
//!
//! Maps `CoreError` to HTTP status codes and JSON bodies. Store and
//! consistency failures are logged here, once, with the detail the client
//! does not get to see.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use savaeat_core::{CoreError, RepositoryError};
use serde::Serialize;
use thiserror::Error;

/// Shown to clients when the store is unreachable.
pub const UNAVAILABLE_MESSAGE: &str = "temporarily unavailable, please retry";

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or unknown session token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but not allowed to touch this resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store or external service down; the client may retry.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::ServiceUnavailable(msg)
            | Self::Internal(msg) => msg,
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::BadRequest(msg),
            CoreError::Settings(e) => Self::BadRequest(e.to_string()),
            CoreError::Unauthorized(msg) => Self::Unauthorized(msg),
            err @ CoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            CoreError::Conflict(msg) => Self::Conflict(msg),
            CoreError::Repository(repo_err) => repo_err.into(),
            CoreError::ExternalService(msg) => {
                tracing::warn!(target: "savaeat.http", error = %msg, "external service failed");
                Self::ServiceUnavailable(msg)
            }
            err @ (CoreError::InvariantViolation(_) | CoreError::PartialWrite { .. }) => {
                tracing::error!(target: "savaeat.http", error = %err, "consistency failure");
                Self::Internal("internal error".to_string())
            }
        }
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(msg),
            RepositoryError::AlreadyExists(msg) => Self::Conflict(msg),
            other => {
                tracing::warn!(target: "savaeat.http", error = %other, "repository unavailable");
                Self::ServiceUnavailable(UNAVAILABLE_MESSAGE.to_string())
            }
        }
    }
}
