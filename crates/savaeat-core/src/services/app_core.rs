//! `AppCore` - the primary application facade.
//!
//! Adapters receive an `AppCore` built at their composition root and reach
//! every service through it.

use std::sync::Arc;

use super::{
    AccountService, DirectionsService, DirectoryService, IdentityService, LikeService,
    ProfileService, RatingService, ReviewService, SettingsService,
};
use crate::ports::{AppEventEmitter, AuthProvider, Repos, RoutingPort};
use crate::utils::KeyedLocks;

/// The core application facade.
///
/// ```ignore
/// let repos = CoreFactory::build_repos(pool.clone());
/// let auth = CoreFactory::auth_provider(pool);
/// let core = AppCore::new(repos, auth, emitter).with_routing(osrm);
///
/// let nearby = core.directory().find_vendors(origin, 5.0, "").await?;
/// ```
pub struct AppCore {
    directory: DirectoryService,
    ratings: RatingService,
    likes: LikeService,
    profiles: ProfileService,
    reviews: ReviewService,
    identity: IdentityService,
    accounts: AccountService,
    settings: SettingsService,
    directions: Option<DirectionsService>,
}

impl AppCore {
    /// Wire every service to the given ports.
    ///
    /// Rating and like writes share one set of per-vendor locks.
    pub fn new(
        repos: Repos,
        auth: Arc<dyn AuthProvider>,
        emitter: Arc<dyn AppEventEmitter>,
    ) -> Self {
        let locks = Arc::new(KeyedLocks::new());

        Self {
            directory: DirectoryService::new(
                Arc::clone(&repos.vendors),
                Arc::clone(&repos.settings),
            ),
            ratings: RatingService::new(
                Arc::clone(&repos.reviews),
                Arc::clone(&repos.vendors),
                Arc::clone(&repos.clients),
                Arc::clone(&repos.settings),
                Arc::clone(&emitter),
                Arc::clone(&locks),
            ),
            likes: LikeService::new(
                Arc::clone(&repos.vendors),
                Arc::clone(&repos.clients),
                Arc::clone(&emitter),
                locks,
            ),
            profiles: ProfileService::new(
                Arc::clone(&repos.vendors),
                Arc::clone(&repos.clients),
                Arc::clone(&emitter),
            ),
            reviews: ReviewService::new(
                Arc::clone(&repos.reviews),
                Arc::clone(&repos.vendors),
                Arc::clone(&repos.clients),
            ),
            identity: IdentityService::new(
                Arc::clone(&auth),
                Arc::clone(&repos.vendors),
                Arc::clone(&repos.clients),
            ),
            accounts: AccountService::new(
                auth,
                Arc::clone(&repos.vendors),
                Arc::clone(&repos.clients),
                emitter,
            ),
            settings: SettingsService::new(repos.settings),
            directions: None,
        }
    }

    /// Enable map directions.
    #[must_use]
    pub fn with_routing(mut self, routing: Arc<dyn RoutingPort>) -> Self {
        self.directions = Some(DirectionsService::new(routing));
        self
    }

    pub const fn directory(&self) -> &DirectoryService {
        &self.directory
    }

    pub const fn ratings(&self) -> &RatingService {
        &self.ratings
    }

    pub const fn likes(&self) -> &LikeService {
        &self.likes
    }

    pub const fn profiles(&self) -> &ProfileService {
        &self.profiles
    }

    pub const fn reviews(&self) -> &ReviewService {
        &self.reviews
    }

    pub const fn identity(&self) -> &IdentityService {
        &self.identity
    }

    pub const fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub const fn settings(&self) -> &SettingsService {
        &self.settings
    }

    /// `None` when no routing service is configured.
    pub const fn directions(&self) -> Option<&DirectionsService> {
        self.directions.as_ref()
    }
}
