//! OSRM `route` service response shapes.

use savaeat_core::GeoPoint;
use serde::Deserialize;

use crate::error::{OsrmError, OsrmResult};

/// Top-level response. `code` is `"Ok"` on success.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    pub geometry: LineString,
    /// Meters.
    #[serde(default)]
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
}

/// GeoJSON line string; coordinates are `[lng, lat]`.
#[derive(Debug, Deserialize)]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteResponse {
    /// The first route, or the refusal OSRM reported.
    pub fn first_route(self) -> OsrmResult<Route> {
        if self.code != "Ok" {
            return Err(OsrmError::Refused {
                message: self.message.unwrap_or_default(),
                code: self.code,
            });
        }
        self.routes
            .into_iter()
            .next()
            .ok_or_else(|| OsrmError::InvalidResponse {
                message: "response has no routes".to_string(),
            })
    }
}

impl Route {
    /// Geometry flipped to `GeoPoint`s.
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| GeoPoint::new(lat, lng))
            .collect()
    }
}
