//! Review repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{NewReview, Review};

/// Repository for reviews.
///
/// Reviews are plain rows; keeping vendor aggregates consistent is the
/// rating service's job.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persist a new review, assigning it a fresh id.
    async fn create(&self, review: &NewReview) -> Result<Review, RepositoryError>;

    async fn get_by_id(&self, id: &str) -> Result<Review, RepositoryError>;

    /// Reviews of one vendor, newest first.
    async fn list_for_vendor(&self, vendor_id: &str) -> Result<Vec<Review>, RepositoryError>;

    /// Overwrite rating, comment and `updated_at`.
    ///
    /// Returns `NotFound` if the review doesn't exist.
    async fn update(&self, review: &Review) -> Result<(), RepositoryError>;

    /// Returns `NotFound` if the review doesn't exist.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Put back a previously deleted or modified review exactly as given,
    /// keeping its id. Used to compensate failed multi-step writes.
    async fn restore(&self, review: &Review) -> Result<(), RepositoryError>;
}
