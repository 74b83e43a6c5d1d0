//! OSRM client and its `RoutingPort` implementation.

use async_trait::async_trait;
use savaeat_core::{GeoPoint, RoutingError, RoutingPort};
use url::Url;

use crate::config::OsrmClientConfig;
use crate::error::OsrmResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::RouteResponse;

/// Default OSRM client using the reqwest HTTP backend.
pub type DefaultOsrmClient = OsrmClient<ReqwestBackend>;

/// Client for the OSRM `route` service.
///
/// Generic over the HTTP backend so tests can feed canned responses. Use
/// `DefaultOsrmClient` in production.
pub struct OsrmClient<B: HttpBackend> {
    backend: B,
    base_url: Url,
    profile: String,
}

impl DefaultOsrmClient {
    pub fn new(config: &OsrmClientConfig) -> OsrmResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        Self::with_backend(config, backend)
    }
}

impl<B: HttpBackend> OsrmClient<B> {
    pub fn with_backend(config: &OsrmClientConfig, backend: B) -> OsrmResult<Self> {
        // A trailing slash makes `join` append instead of replacing the last segment.
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');

        Ok(Self {
            backend,
            base_url: Url::parse(&base)?,
            profile: config.profile.clone(),
        })
    }

    pub(crate) fn route_url(&self, from: GeoPoint, to: GeoPoint) -> OsrmResult<Url> {
        let mut url = self.base_url.join(&format!(
            "route/v1/{}/{},{};{},{}",
            self.profile, from.lng, from.lat, to.lng, to.lat
        ))?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson");
        Ok(url)
    }

    async fn fetch_route(&self, from: GeoPoint, to: GeoPoint) -> OsrmResult<Vec<GeoPoint>> {
        let url = self.route_url(from, to)?;
        let response: RouteResponse = self.backend.get_json(&url).await?;
        let route = response.first_route()?;

        tracing::debug!(
            target: "savaeat.osrm",
            distance_m = route.distance,
            duration_s = route.duration,
            "route found"
        );
        Ok(route.into_points())
    }
}

#[async_trait]
impl<B: HttpBackend> RoutingPort for OsrmClient<B> {
    async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Vec<GeoPoint>, RoutingError> {
        self.fetch_route(from, to).await.map_err(|e| {
            tracing::warn!(target: "savaeat.osrm", error = %e, "routing request failed");
            RoutingError::from(e)
        })
    }
}
