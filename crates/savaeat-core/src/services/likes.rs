//! Favorite/like relationship.
//!
//! A like is stored twice: the liker's id in `vendor.likedBy` and the vendor's
//! id in the liker's `favoriteVendors`. Likers are clients or vendors.
//! Toggles hold the vendor's keyed lock, so concurrent toggles of one vendor
//! are applied one after another. The two set writes are issued concurrently;
//! if exactly one fails it is undone, unless that side already held the
//! target state before the toggle.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::{LikeOutcome, LikerType, RepairReport, Role, Vendor};
use crate::events::AppEvent;
use crate::ports::{
    AppEventEmitter, ClientRepository, CoreError, EntityKind, RepositoryError, VendorRepository,
    lookup_error,
};
use crate::utils::KeyedLocks;

pub struct LikeService {
    vendors: Arc<dyn VendorRepository>,
    clients: Arc<dyn ClientRepository>,
    emitter: Arc<dyn AppEventEmitter>,
    locks: Arc<KeyedLocks>,
}

impl LikeService {
    pub fn new(
        vendors: Arc<dyn VendorRepository>,
        clients: Arc<dyn ClientRepository>,
        emitter: Arc<dyn AppEventEmitter>,
        locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            vendors,
            clients,
            emitter,
            locks,
        }
    }

    /// Flip `liker_id`'s like of `vendor_id`.
    ///
    /// Both documents are checked before anything is written. The direction
    /// follows `vendor.likedBy`. When the liker's favorites already disagreed
    /// with it (an asymmetry left by an earlier failure), the favorites write is
    /// a no-op and is not undone if the vendor side fails; `repair_likes`
    /// settles such pairs.
    pub async fn toggle_like(
        &self,
        vendor_id: &str,
        liker_id: &str,
        liker_type: LikerType,
    ) -> Result<LikeOutcome, CoreError> {
        let _guard = self.locks.lock(vendor_id).await;

        let vendor = self
            .vendors
            .get_by_id(vendor_id)
            .await
            .map_err(lookup_error(EntityKind::Vendor, vendor_id))?;
        let liker_had_favorite = self
            .favorites_of(liker_id, liker_type)
            .await?
            .iter()
            .any(|id| id == vendor_id);

        let liked = !vendor.is_liked_by(liker_id);
        let (vendor_side, liker_side) = if liked {
            tokio::join!(
                self.vendors.add_liker(vendor_id, liker_id),
                self.add_favorite(liker_type, liker_id, vendor_id)
            )
        } else {
            tokio::join!(
                self.vendors.remove_liker(vendor_id, liker_id),
                self.remove_favorite(liker_type, liker_id, vendor_id)
            )
        };

        match (vendor_side, liker_side) {
            (Ok(()), Ok(())) => {}
            (Err(cause), Err(_)) => {
                warn!(
                    target: "savaeat.likes",
                    vendor_id,
                    liker_id,
                    error = %cause,
                    "both like writes failed"
                );
                return Err(cause.into());
            }
            (Ok(()), Err(cause)) => {
                let undo = if liked {
                    self.vendors.remove_liker(vendor_id, liker_id).await
                } else {
                    self.vendors.add_liker(vendor_id, liker_id).await
                };
                return Err(undo_outcome(vendor_id, liker_id, cause, undo));
            }
            (Err(cause), Ok(())) if liker_had_favorite == liked => {
                warn!(
                    target: "savaeat.likes",
                    vendor_id,
                    liker_id,
                    error = %cause,
                    "like write failed, favorites side was already set"
                );
                return Err(cause.into());
            }
            (Err(cause), Ok(())) => {
                let undo = if liked {
                    self.remove_favorite(liker_type, liker_id, vendor_id).await
                } else {
                    self.add_favorite(liker_type, liker_id, vendor_id).await
                };
                return Err(undo_outcome(vendor_id, liker_id, cause, undo));
            }
        }

        debug!(target: "savaeat.likes", vendor_id, liker_id, %liker_type, liked, "like toggled");
        self.emitter.emit(AppEvent::LikeToggled {
            vendor_id: vendor_id.to_string(),
            liker_id: liker_id.to_string(),
            liker_type,
            liked,
        });
        Ok(LikeOutcome { liked })
    }

    /// The liker's favorite vendors whose name contains `name_filter`.
    ///
    /// Favorites pointing at vendors that no longer exist are skipped.
    pub async fn favorites(
        &self,
        liker_id: &str,
        liker_type: LikerType,
        name_filter: &str,
    ) -> Result<Vec<Vendor>, CoreError> {
        let needle = name_filter.trim().to_lowercase();
        let ids = self.favorites_of(liker_id, liker_type).await?;

        let mut vendors = Vec::with_capacity(ids.len());
        for id in ids {
            match self.vendors.get_by_id(&id).await {
                Ok(vendor) if vendor.name_matches(&needle) => vendors.push(vendor),
                Ok(_) => {}
                Err(RepositoryError::NotFound(_)) => {
                    debug!(target: "savaeat.likes", liker_id, vendor_id = %id, "favorite vendor is gone");
                }
                Err(e) => return Err(e.into()),
            }
        }
        vendors.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(vendors)
    }

    /// Make both sides of every like agree, treating `vendor.likedBy` as
    /// the source of truth.
    pub async fn repair_likes(&self) -> Result<RepairReport, CoreError> {
        let mut report = RepairReport::default();

        for snapshot in self.vendors.list().await? {
            let _guard = self.locks.lock(&snapshot.id).await;
            // Re-read under the lock; toggles may have run since the listing.
            let vendor = match self.vendors.get_by_id(&snapshot.id).await {
                Ok(vendor) => vendor,
                Err(RepositoryError::NotFound(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            report.vendors_scanned += 1;

            for liker_id in &vendor.liked_by {
                match self.find_liker(liker_id).await? {
                    Some((liker_type, favorites)) => {
                        if !favorites.iter().any(|f| f == &vendor.id) {
                            self.add_favorite(liker_type, liker_id, &vendor.id).await?;
                            report.favorites_added += 1;
                        }
                    }
                    None => {
                        self.vendors.remove_liker(&vendor.id, liker_id).await?;
                        report.dangling_likes_removed += 1;
                    }
                }
            }
        }

        let mut likers: Vec<(LikerType, String, Vec<String>)> = Vec::new();
        for client in self.clients.list().await? {
            likers.push((
                Role::Client,
                client.id,
                client.favorite_vendors.into_iter().collect(),
            ));
        }
        for vendor in self.vendors.list().await? {
            likers.push((
                Role::Vendor,
                vendor.id,
                vendor.favorite_vendors.into_iter().collect(),
            ));
        }

        for (liker_type, liker_id, favorites) in likers {
            for vendor_id in favorites {
                let _guard = self.locks.lock(&vendor_id).await;
                let confirmed = match self.vendors.get_by_id(&vendor_id).await {
                    Ok(vendor) => vendor.is_liked_by(&liker_id),
                    Err(RepositoryError::NotFound(_)) => false,
                    Err(e) => return Err(e.into()),
                };
                if !confirmed {
                    self.remove_favorite(liker_type, &liker_id, &vendor_id)
                        .await?;
                    report.favorites_removed += 1;
                }
            }
        }

        info!(
            target: "savaeat.likes",
            vendors_scanned = report.vendors_scanned,
            dangling_likes_removed = report.dangling_likes_removed,
            favorites_added = report.favorites_added,
            favorites_removed = report.favorites_removed,
            "like repair finished"
        );
        Ok(report)
    }

    async fn favorites_of(
        &self,
        liker_id: &str,
        liker_type: LikerType,
    ) -> Result<Vec<String>, CoreError> {
        let lookup = lookup_error(liker_type.into(), liker_id);
        let favorites = match liker_type {
            Role::Client => self
                .clients
                .get_by_id(liker_id)
                .await
                .map_err(lookup)?
                .favorite_vendors,
            Role::Vendor => self
                .vendors
                .get_by_id(liker_id)
                .await
                .map_err(lookup)?
                .favorite_vendors,
        };
        Ok(favorites.into_iter().collect())
    }

    /// Locate a liker in either collection, clients first.
    async fn find_liker(
        &self,
        liker_id: &str,
    ) -> Result<Option<(LikerType, Vec<String>)>, CoreError> {
        for liker_type in [Role::Client, Role::Vendor] {
            match self.favorites_of(liker_id, liker_type).await {
                Ok(favorites) => return Ok(Some((liker_type, favorites))),
                Err(CoreError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    async fn add_favorite(
        &self,
        liker_type: LikerType,
        liker_id: &str,
        vendor_id: &str,
    ) -> Result<(), RepositoryError> {
        match liker_type {
            Role::Client => self.clients.add_favorite(liker_id, vendor_id).await,
            Role::Vendor => self.vendors.add_favorite(liker_id, vendor_id).await,
        }
    }

    async fn remove_favorite(
        &self,
        liker_type: LikerType,
        liker_id: &str,
        vendor_id: &str,
    ) -> Result<(), RepositoryError> {
        match liker_type {
            Role::Client => self.clients.remove_favorite(liker_id, vendor_id).await,
            Role::Vendor => self.vendors.remove_favorite(liker_id, vendor_id).await,
        }
    }
}

fn undo_outcome(
    vendor_id: &str,
    liker_id: &str,
    cause: RepositoryError,
    undo: Result<(), RepositoryError>,
) -> CoreError {
    match undo {
        Ok(()) => {
            warn!(
                target: "savaeat.likes",
                vendor_id,
                liker_id,
                error = %cause,
                "like write failed, other side rolled back"
            );
            cause.into()
        }
        Err(undo_err) => {
            error!(
                target: "savaeat.likes",
                vendor_id,
                liker_id,
                error = %cause,
                rollback_error = %undo_err,
                "like relation left asymmetric; run like repair"
            );
            CoreError::partial_write(
                "toggle_like",
                format!("{cause}; rollback failed: {undo_err}"),
            )
        }
    }
}
