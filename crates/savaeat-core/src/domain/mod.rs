//! Domain types for the marketplace.
//!
//! Pure data and math. Nothing here touches storage or the network.

pub mod account;
pub mod client;
pub mod geo;
pub mod rating;
pub mod review;
pub mod vendor;

use thiserror::Error;

pub use account::{
    CurrentUser, LikeOutcome, LikerType, MIN_PASSWORD_LENGTH, Principal, RegisterRequest,
    RepairReport, ResolvedRole, Role, Session, UserProfile,
};
pub use client::{Client, ClientProfile};
pub use geo::{EARTH_RADIUS_KM, GeoPoint, distance_km};
pub use rating::{AggregateError, RatingAggregate};
pub use review::{
    AuthorSummary, MAX_RATING, MIN_RATING, NewReview, Review, ReviewWithAuthor,
    VendorWithReviews, validate_review_input,
};
pub use vendor::{NearbyVendor, PLACEHOLDER_IMAGE_URL, Vendor, VendorProfile};

/// User input that failed a domain check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidInput(pub String);

impl InvalidInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
