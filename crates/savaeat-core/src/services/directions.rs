//! Map directions, forwarded to the routing service.

use std::sync::Arc;

use tracing::warn;

use crate::domain::GeoPoint;
use crate::ports::{CoreError, RoutingPort};

pub struct DirectionsService {
    routing: Arc<dyn RoutingPort>,
}

impl DirectionsService {
    pub fn new(routing: Arc<dyn RoutingPort>) -> Self {
        Self { routing }
    }

    /// Driving route polyline from `from` to `to`.
    pub async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Vec<GeoPoint>, CoreError> {
        if !from.is_valid() || !to.is_valid() {
            return Err(CoreError::Validation(
                "route endpoints must be valid coordinates".to_string(),
            ));
        }
        self.routing.route(from, to).await.map_err(|e| {
            warn!(target: "savaeat.directions", error = %e, "routing service failed");
            CoreError::from(e)
        })
    }
}
