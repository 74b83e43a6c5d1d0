//! Vendor domain types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::InvalidInput;
use super::geo::GeoPoint;
use super::rating::RatingAggregate;
use crate::utils::validation::{require_non_empty, valid_latitude, valid_longitude};

/// Image shown when a profile has none.
pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder.png";

/// A food vendor as stored, including maintained fields.
///
/// `average_rating`, `ratings_count`, `liked_by` and `favorite_vendors` are
/// owned by the rating and like services; profile saves never touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image_url: String,
    pub banner_image_url: String,
    pub description: String,
    pub shop_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone_number: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub average_rating: f64,
    pub ratings_count: u32,
    pub liked_by: BTreeSet<String>,
    pub favorite_vendors: BTreeSet<String>,
}

impl Vendor {
    /// Build a freshly registered vendor: no ratings, no likes.
    pub fn new(id: impl Into<String>, profile: VendorProfile, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: profile.name,
            email: profile.email,
            profile_image_url: profile.profile_image_url,
            banner_image_url: profile.banner_image_url,
            description: profile.description,
            shop_name: profile.shop_name,
            address: profile.address,
            latitude: profile.latitude,
            longitude: profile.longitude,
            phone_number: profile.phone_number,
            created_at,
            average_rating: 0.0,
            ratings_count: 0,
            liked_by: BTreeSet::new(),
            favorite_vendors: BTreeSet::new(),
        }
    }

    pub const fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub const fn aggregate(&self) -> RatingAggregate {
        RatingAggregate::new(self.average_rating, self.ratings_count)
    }

    pub fn is_liked_by(&self, liker_id: &str) -> bool {
        self.liked_by.contains(liker_id)
    }

    /// Case-insensitive substring match on the display name.
    ///
    /// `needle` is expected to be lowercased already; an empty needle matches.
    pub fn name_matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }

    /// The editable part of this vendor.
    pub fn profile(&self) -> VendorProfile {
        VendorProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            profile_image_url: self.profile_image_url.clone(),
            banner_image_url: self.banner_image_url.clone(),
            description: self.description.clone(),
            shop_name: self.shop_name.clone(),
            address: self.address.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            phone_number: self.phone_number.clone(),
        }
    }
}

/// Editable vendor attributes.
///
/// Carries no id, so a save can never re-key a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub banner_image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub phone_number: String,
}

impl VendorProfile {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        require_non_empty("name", &self.name)?;
        if !valid_latitude(self.latitude) {
            return Err(InvalidInput::new(format!(
                "latitude must be between -90 and 90, got {}",
                self.latitude
            )));
        }
        if !valid_longitude(self.longitude) {
            return Err(InvalidInput::new(format!(
                "longitude must be between -180 and 180, got {}",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// A directory hit: the vendor plus its distance from the query origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyVendor {
    #[serde(flatten)]
    pub vendor: Vendor,
    pub distance_km: f64,
}
