//! Query strings and small bodies for the vendor, favorites and directions
//! endpoints.

use savaeat_core::GeoPoint;
use serde::{Deserialize, Serialize};

/// `GET /api/vendors?lat&lng&radiusKm&q`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    /// Falls back to the configured default radius.
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub q: String,
}

impl NearbyQuery {
    pub const fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// `GET /api/me/favorites?q`
#[derive(Debug, Default, Deserialize)]
pub struct FavoritesQuery {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/directions?fromLat&fromLng&toLat&toLng`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsQuery {
    pub from_lat: f64,
    pub from_lng: f64,
    pub to_lat: f64,
    pub to_lng: f64,
}

impl DirectionsQuery {
    pub const fn endpoints(&self) -> (GeoPoint, GeoPoint) {
        (
            GeoPoint::new(self.from_lat, self.from_lng),
            GeoPoint::new(self.to_lat, self.to_lng),
        )
    }
}

/// Body of review create and update.
#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    pub rating: u8,
    pub comment: String,
}

/// A route as a polyline of points.
#[derive(Debug, Serialize)]
pub struct RouteDto {
    pub points: Vec<GeoPoint>,
}
