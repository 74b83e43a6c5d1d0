//! Internal error types for OSRM calls.
//!
//! Mapped to the core `RoutingError` at the port boundary.

use savaeat_core::RoutingError;
use thiserror::Error;

pub type OsrmResult<T> = Result<T, OsrmError>;

#[derive(Debug, Error)]
pub enum OsrmError {
    /// Non-success status without an OSRM error body.
    #[error("OSRM request failed with status {status}: {url}")]
    ApiRequestFailed { status: u16, url: String },

    /// OSRM answered with an error code such as `NoRoute` or `InvalidQuery`.
    #[error("OSRM refused the request ({code}): {message}")]
    Refused { code: String, message: String },

    #[error("Invalid response from OSRM: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<OsrmError> for RoutingError {
    fn from(err: OsrmError) -> Self {
        match err {
            OsrmError::Refused { code, message } => Self::NoRoute {
                message: format!("{code}: {message}"),
            },
            OsrmError::ApiRequestFailed { .. } | OsrmError::Network(_) => Self::Network {
                message: err.to_string(),
            },
            OsrmError::InvalidResponse { .. }
            | OsrmError::InvalidUrl(_)
            | OsrmError::JsonParse(_) => Self::InvalidResponse {
                message: err.to_string(),
            },
        }
    }
}
