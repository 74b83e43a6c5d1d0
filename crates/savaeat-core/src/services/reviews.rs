//! Review listing with resolved authors.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{AuthorSummary, Review, ReviewWithAuthor, VendorWithReviews};
use crate::ports::{
    ClientRepository, CoreError, EntityKind, RepositoryError, ReviewRepository, VendorRepository,
    lookup_error,
};

/// Read side of reviews. Writes go through `RatingService`.
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    vendors: Arc<dyn VendorRepository>,
    clients: Arc<dyn ClientRepository>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        vendors: Arc<dyn VendorRepository>,
        clients: Arc<dyn ClientRepository>,
    ) -> Self {
        Self {
            reviews,
            vendors,
            clients,
        }
    }

    pub async fn get(&self, review_id: &str) -> Result<Review, CoreError> {
        self.reviews
            .get_by_id(review_id)
            .await
            .map_err(lookup_error(EntityKind::Review, review_id))
    }

    /// Reviews of a vendor, newest first, each with its author's summary.
    pub async fn reviews_for_vendor(
        &self,
        vendor_id: &str,
    ) -> Result<Vec<ReviewWithAuthor>, CoreError> {
        self.vendors
            .get_by_id(vendor_id)
            .await
            .map_err(lookup_error(EntityKind::Vendor, vendor_id))?;
        self.with_authors(self.reviews.list_for_vendor(vendor_id).await?)
            .await
    }

    pub async fn vendor_with_reviews(&self, vendor_id: &str) -> Result<VendorWithReviews, CoreError> {
        let vendor = self
            .vendors
            .get_by_id(vendor_id)
            .await
            .map_err(lookup_error(EntityKind::Vendor, vendor_id))?;
        let reviews = self
            .with_authors(self.reviews.list_for_vendor(vendor_id).await?)
            .await?;
        Ok(VendorWithReviews { vendor, reviews })
    }

    async fn with_authors(&self, reviews: Vec<Review>) -> Result<Vec<ReviewWithAuthor>, CoreError> {
        let mut authors: HashMap<String, Option<AuthorSummary>> = HashMap::new();
        let mut out = Vec::with_capacity(reviews.len());

        for review in reviews {
            let author = match authors.get(&review.author_id) {
                Some(cached) => cached.clone(),
                None => {
                    let resolved = self.author(&review.author_id).await?;
                    authors.insert(review.author_id.clone(), resolved.clone());
                    resolved
                }
            };
            out.push(ReviewWithAuthor { review, author });
        }
        Ok(out)
    }

    /// Clients first, then vendors.
    async fn author(&self, id: &str) -> Result<Option<AuthorSummary>, CoreError> {
        match self.clients.get_by_id(id).await {
            Ok(client) => {
                return Ok(Some(AuthorSummary {
                    id: client.id,
                    name: client.name,
                    profile_image_url: client.profile_image_url,
                }));
            }
            Err(RepositoryError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
        match self.vendors.get_by_id(id).await {
            Ok(vendor) => Ok(Some(AuthorSummary {
                id: vendor.id,
                name: vendor.name,
                profile_image_url: vendor.profile_image_url,
            })),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
