//! Rating aggregate maintenance.
//!
//! Every review create/update/delete is paired with the matching update of the
//! vendor's `(averageRating, ratingsCount)`. The store offers no multi-document
//! transaction, so each operation:
//!
//! 1. takes the vendor's keyed lock, so writes for one vendor never interleave;
//! 2. validates and computes the new aggregate before writing anything;
//! 3. writes the review, then the aggregate;
//! 4. undoes the review write if the aggregate write fails.
//!
//! If the undo fails too, the operation returns `CoreError::PartialWrite` and
//! logs at error level; `recompute_aggregate` is the repair path.

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{NewReview, RatingAggregate, Review, validate_review_input};
use crate::events::AppEvent;
use crate::ports::{
    AppEventEmitter, ClientRepository, CoreError, EntityKind, RepositoryError, ReviewRepository,
    SettingsRepository, VendorRepository, lookup_error,
};
use crate::utils::validation::require_non_empty;
use crate::utils::{KeyedLocks, now_millis};

pub struct RatingService {
    reviews: Arc<dyn ReviewRepository>,
    vendors: Arc<dyn VendorRepository>,
    clients: Arc<dyn ClientRepository>,
    settings: Arc<dyn SettingsRepository>,
    emitter: Arc<dyn AppEventEmitter>,
    locks: Arc<KeyedLocks>,
}

impl RatingService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        vendors: Arc<dyn VendorRepository>,
        clients: Arc<dyn ClientRepository>,
        settings: Arc<dyn SettingsRepository>,
        emitter: Arc<dyn AppEventEmitter>,
        locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            reviews,
            vendors,
            clients,
            settings,
            emitter,
            locks,
        }
    }

    async fn checked_input(&self, rating: u8, comment: &str) -> Result<String, CoreError> {
        let max_len = self.settings.load().await?.effective_max_comment_length();
        Ok(validate_review_input(rating, comment, max_len)?)
    }

    /// Create a review and fold its rating into the vendor aggregate.
    pub async fn add_review(
        &self,
        vendor_id: &str,
        author_id: &str,
        author_name: &str,
        rating: u8,
        comment: &str,
    ) -> Result<Review, CoreError> {
        require_non_empty("authorId", author_id)?;
        let comment = self.checked_input(rating, comment).await?;

        let _guard = self.locks.lock(vendor_id).await;

        let vendor = self
            .vendors
            .get_by_id(vendor_id)
            .await
            .map_err(lookup_error(EntityKind::Vendor, vendor_id))?;
        let aggregate = vendor.aggregate().with_added(rating);

        let review = self
            .reviews
            .create(&NewReview {
                author_id: author_id.to_string(),
                author_name: author_name.trim().to_string(),
                vendor_id: vendor_id.to_string(),
                rating,
                comment,
                created_at: now_millis(),
            })
            .await?;

        if let Err(cause) = self.vendors.set_rating(vendor_id, aggregate).await {
            return Err(compensate("add_review", cause, self.reviews.delete(&review.id)).await);
        }

        self.link_client_review(author_id, &review.id).await;

        info!(
            target: "savaeat.ratings",
            vendor_id,
            review_id = %review.id,
            rating,
            average = aggregate.average,
            count = aggregate.count,
            "review added"
        );
        self.emitter.emit(AppEvent::ReviewAdded {
            vendor_id: vendor_id.to_string(),
            review_id: review.id.clone(),
            rating,
        });
        self.emitter
            .emit(AppEvent::rating_changed(vendor_id, aggregate));
        Ok(review)
    }

    /// Change a review's rating and comment, adjusting the aggregate.
    pub async fn update_review(
        &self,
        review_id: &str,
        vendor_id: &str,
        new_rating: u8,
        new_comment: &str,
    ) -> Result<Review, CoreError> {
        let comment = self.checked_input(new_rating, new_comment).await?;

        let _guard = self.locks.lock(vendor_id).await;

        let existing = self.review_of_vendor(review_id, vendor_id).await?;
        let vendor = self
            .vendors
            .get_by_id(vendor_id)
            .await
            .map_err(lookup_error(EntityKind::Vendor, vendor_id))?;
        let aggregate = vendor
            .aggregate()
            .with_replaced(existing.rating, new_rating)
            .map_err(|e| {
                error!(
                    target: "savaeat.ratings",
                    vendor_id,
                    review_id,
                    "review exists but vendor has no ratings"
                );
                CoreError::from(e)
            })?;

        let updated = Review {
            rating: new_rating,
            comment,
            updated_at: Some(now_millis()),
            ..existing.clone()
        };
        self.reviews
            .update(&updated)
            .await
            .map_err(lookup_error(EntityKind::Review, review_id))?;

        if let Err(cause) = self.vendors.set_rating(vendor_id, aggregate).await {
            return Err(compensate("update_review", cause, self.reviews.restore(&existing)).await);
        }

        info!(
            target: "savaeat.ratings",
            vendor_id,
            review_id,
            old_rating = existing.rating,
            new_rating,
            average = aggregate.average,
            "review updated"
        );
        self.emitter.emit(AppEvent::ReviewUpdated {
            vendor_id: vendor_id.to_string(),
            review_id: review_id.to_string(),
            rating: new_rating,
        });
        self.emitter
            .emit(AppEvent::rating_changed(vendor_id, aggregate));
        Ok(updated)
    }

    /// Delete a review and take its rating out of the aggregate.
    pub async fn delete_review(&self, review_id: &str, vendor_id: &str) -> Result<(), CoreError> {
        let _guard = self.locks.lock(vendor_id).await;

        let existing = self.review_of_vendor(review_id, vendor_id).await?;
        let vendor = self
            .vendors
            .get_by_id(vendor_id)
            .await
            .map_err(lookup_error(EntityKind::Vendor, vendor_id))?;
        if vendor.ratings_count == 0 {
            error!(
                target: "savaeat.ratings",
                vendor_id,
                review_id,
                "review exists but vendor has no ratings"
            );
            return Err(CoreError::InvariantViolation(format!(
                "vendor {vendor_id} has no ratings but review {review_id} exists"
            )));
        }
        let aggregate = vendor.aggregate().with_removed(existing.rating);

        self.reviews
            .delete(review_id)
            .await
            .map_err(lookup_error(EntityKind::Review, review_id))?;

        if let Err(cause) = self.vendors.set_rating(vendor_id, aggregate).await {
            return Err(compensate("delete_review", cause, self.reviews.restore(&existing)).await);
        }

        self.unlink_client_review(&existing.author_id, review_id)
            .await;

        info!(
            target: "savaeat.ratings",
            vendor_id,
            review_id,
            average = aggregate.average,
            count = aggregate.count,
            "review deleted"
        );
        self.emitter.emit(AppEvent::ReviewDeleted {
            vendor_id: vendor_id.to_string(),
            review_id: review_id.to_string(),
        });
        self.emitter
            .emit(AppEvent::rating_changed(vendor_id, aggregate));
        Ok(())
    }

    /// Rebuild a vendor's aggregate from all of its reviews.
    ///
    /// Repair path only; normal writes are incremental.
    pub async fn recompute_aggregate(&self, vendor_id: &str) -> Result<RatingAggregate, CoreError> {
        let _guard = self.locks.lock(vendor_id).await;

        let vendor = self
            .vendors
            .get_by_id(vendor_id)
            .await
            .map_err(lookup_error(EntityKind::Vendor, vendor_id))?;
        let reviews = self.reviews.list_for_vendor(vendor_id).await?;
        let aggregate = RatingAggregate::from_ratings(reviews.iter().map(|r| r.rating));

        self.vendors.set_rating(vendor_id, aggregate).await?;

        if aggregate != vendor.aggregate() {
            warn!(
                target: "savaeat.ratings",
                vendor_id,
                stored_average = vendor.average_rating,
                stored_count = vendor.ratings_count,
                average = aggregate.average,
                count = aggregate.count,
                "aggregate drift repaired"
            );
            self.emitter
                .emit(AppEvent::rating_changed(vendor_id, aggregate));
        }
        Ok(aggregate)
    }

    async fn review_of_vendor(&self, review_id: &str, vendor_id: &str) -> Result<Review, CoreError> {
        let review = self
            .reviews
            .get_by_id(review_id)
            .await
            .map_err(lookup_error(EntityKind::Review, review_id))?;
        if review.vendor_id != vendor_id {
            return Err(CoreError::Validation(format!(
                "review {review_id} does not belong to vendor {vendor_id}"
            )));
        }
        Ok(review)
    }

    // Only client authors carry a review index; vendor authors report NotFound.
    async fn link_client_review(&self, author_id: &str, review_id: &str) {
        match self.clients.add_review_id(author_id, review_id).await {
            Ok(()) | Err(RepositoryError::NotFound(_)) => {}
            Err(e) => warn!(
                target: "savaeat.ratings",
                author_id,
                review_id,
                error = %e,
                "failed to index review on client"
            ),
        }
    }

    async fn unlink_client_review(&self, author_id: &str, review_id: &str) {
        match self.clients.remove_review_id(author_id, review_id).await {
            Ok(()) | Err(RepositoryError::NotFound(_)) => {}
            Err(e) => warn!(
                target: "savaeat.ratings",
                author_id,
                review_id,
                error = %e,
                "failed to drop review from client index"
            ),
        }
    }
}

/// Run `undo` after `cause` broke the second write of `operation`.
async fn compensate<F>(operation: &str, cause: RepositoryError, undo: F) -> CoreError
where
    F: Future<Output = Result<(), RepositoryError>> + Send,
{
    match undo.await {
        Ok(()) => {
            warn!(
                target: "savaeat.ratings",
                operation,
                error = %cause,
                "aggregate write failed, review change rolled back"
            );
            CoreError::Repository(cause)
        }
        Err(undo_err) => {
            error!(
                target: "savaeat.ratings",
                operation,
                error = %cause,
                rollback_error = %undo_err,
                "aggregate write failed and rollback failed; review and aggregate disagree"
            );
            CoreError::partial_write(
                operation,
                format!("{cause}; rollback failed: {undo_err}"),
            )
        }
    }
}
