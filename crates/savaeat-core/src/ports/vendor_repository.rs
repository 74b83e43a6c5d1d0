//! Vendor repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{RatingAggregate, Vendor, VendorProfile};

/// Repository for vendor documents.
///
/// Set mutations (`add_liker`, `remove_favorite`, ...) are single atomic
/// operations with set semantics: adding a present member or removing an
/// absent one succeeds without change. They return `NotFound` when the
/// vendor itself is missing.
#[async_trait]
pub trait VendorRepository: Send + Sync {
    /// Every vendor. There is no geo index; callers filter in memory.
    async fn list(&self) -> Result<Vec<Vendor>, RepositoryError>;

    async fn get_by_id(&self, id: &str) -> Result<Vendor, RepositoryError>;

    /// Insert a new vendor document.
    ///
    /// Returns `AlreadyExists` if the id is taken.
    async fn insert(&self, vendor: &Vendor) -> Result<(), RepositoryError>;

    /// Overwrite the editable attributes. Maintained fields are untouched.
    async fn update_profile(&self, id: &str, profile: &VendorProfile)
    -> Result<(), RepositoryError>;

    /// Write `averageRating` and `ratingsCount` together.
    async fn set_rating(&self, id: &str, aggregate: RatingAggregate)
    -> Result<(), RepositoryError>;

    async fn add_liker(&self, id: &str, liker_id: &str) -> Result<(), RepositoryError>;

    async fn remove_liker(&self, id: &str, liker_id: &str) -> Result<(), RepositoryError>;

    async fn add_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError>;

    async fn remove_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError>;
}
