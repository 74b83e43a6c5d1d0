//! Vendor directory query.
//!
//! Full scan of the vendor collection, filtered by distance and name in
//! memory. There is no geo index behind this; the vendor set is small.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{GeoPoint, NearbyVendor, Vendor, distance_km};
use crate::ports::{CoreError, SettingsRepository, VendorRepository};

/// Service answering "which vendors are near me".
pub struct DirectoryService {
    vendors: Arc<dyn VendorRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl DirectoryService {
    pub fn new(vendors: Arc<dyn VendorRepository>, settings: Arc<dyn SettingsRepository>) -> Self {
        Self { vendors, settings }
    }

    /// Radius to use when the caller doesn't pick one.
    pub async fn default_radius_km(&self) -> Result<f64, CoreError> {
        Ok(self.settings.load().await?.effective_default_radius_km())
    }

    /// Vendors within `radius_km` of `origin` whose name contains
    /// `name_filter` (case-insensitive), nearest first.
    ///
    /// A repository failure surfaces as `CoreError::Repository`, which callers
    /// must keep distinct from an empty result.
    pub async fn find_vendors(
        &self,
        origin: GeoPoint,
        radius_km: f64,
        name_filter: &str,
    ) -> Result<Vec<NearbyVendor>, CoreError> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(CoreError::Validation(format!(
                "radius must be a positive number of kilometres, got {radius_km}"
            )));
        }
        if !origin.lat.is_finite() || !origin.lng.is_finite() {
            return Err(CoreError::Validation(
                "origin coordinates must be finite".to_string(),
            ));
        }

        let max_radius = self.settings.load().await?.effective_max_radius_km();
        if radius_km > max_radius {
            return Err(CoreError::Validation(format!(
                "radius {radius_km} km exceeds the maximum of {max_radius} km"
            )));
        }

        let vendors = self.vendors.list().await.map_err(|e| {
            warn!(target: "savaeat.directory", error = %e, "directory unavailable");
            CoreError::from(e)
        })?;
        let scanned = vendors.len();

        let results = filter_nearby(vendors, origin, radius_km, name_filter);
        debug!(
            target: "savaeat.directory",
            scanned,
            matched = results.len(),
            radius_km,
            "directory query"
        );
        Ok(results)
    }
}

/// The pure part of the directory query.
///
/// Keeps vendors with `distance <= radius_km` whose name matches the trimmed
/// filter, ordered by ascending distance, then name, then id.
pub fn filter_nearby(
    vendors: Vec<Vendor>,
    origin: GeoPoint,
    radius_km: f64,
    name_filter: &str,
) -> Vec<NearbyVendor> {
    let needle = name_filter.trim().to_lowercase();

    let mut results: Vec<NearbyVendor> = vendors
        .into_iter()
        .filter(|vendor| vendor.name_matches(&needle))
        .filter_map(|vendor| {
            let distance_km = distance_km(origin, vendor.location());
            (distance_km <= radius_km).then_some(NearbyVendor {
                vendor,
                distance_km,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.vendor.name.cmp(&b.vendor.name))
            .then_with(|| a.vendor.id.cmp(&b.vendor.id))
    });
    results
}
