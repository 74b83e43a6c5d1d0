//! Routing service port.
//!
//! Directions are delegated entirely to an external routing service. The core
//! only forwards two points and hands back the polyline.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::GeoPoint;

/// Errors from routing port operations.
///
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The service answered but found no route between the points.
    #[error("No route found: {message}")]
    NoRoute { message: String },

    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response could not be understood.
    #[error("Invalid routing response: {message}")]
    InvalidResponse { message: String },
}

/// A driving route between two points.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// The route geometry as ordered points, starting near `from`.
    async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Vec<GeoPoint>, RoutingError>;
}
