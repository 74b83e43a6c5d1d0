//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports and domain logic. They don't know
//! about concrete implementations.

mod accounts;
mod app_core;
mod directions;
mod directory;
mod identity;
mod likes;
mod profiles;
mod ratings;
mod reviews;
mod settings_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use accounts::AccountService;
pub use app_core::AppCore;
pub use directions::DirectionsService;
pub use directory::{DirectoryService, filter_nearby};
pub use identity::IdentityService;
pub use likes::LikeService;
pub use profiles::ProfileService;
pub use ratings::RatingService;
pub use reviews::ReviewService;
pub use settings_service::SettingsService;
