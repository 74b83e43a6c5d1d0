#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;
pub mod utils;

// Re-export commonly used types for convenience
pub use domain::{
    AuthorSummary, Client, ClientProfile, CurrentUser, GeoPoint, InvalidInput, LikeOutcome,
    LikerType, NearbyVendor, NewReview, PLACEHOLDER_IMAGE_URL, Principal, RatingAggregate,
    RegisterRequest, RepairReport, ResolvedRole, Review, ReviewWithAuthor, Role, Session,
    UserProfile, Vendor, VendorProfile, VendorWithReviews, distance_km,
};
pub use events::AppEvent;
pub use ports::{
    AppEventEmitter, AuthError, AuthProvider, ClientRepository, CoreError, EntityKind,
    NoopEmitter, Repos, RepositoryError, ReviewRepository, RoutingError, RoutingPort,
    SettingsRepository, VendorRepository,
};
pub use services::{
    AccountService, AppCore, DirectionsService, DirectoryService, IdentityService, LikeService,
    ProfileService, RatingService, ReviewService, SettingsService,
};
pub use settings::{Settings, SettingsError, SettingsUpdate, validate_settings};
pub use utils::KeyedLocks;

pub use paths::{DATA_DIR_ENV, PathError, data_root, database_path, database_path_in};

