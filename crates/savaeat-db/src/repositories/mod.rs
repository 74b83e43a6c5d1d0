//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod member_sets;
mod row_mappers;
mod sqlite_auth_provider;
mod sqlite_client_repository;
mod sqlite_review_repository;
mod sqlite_settings_repository;
mod sqlite_vendor_repository;

pub use sqlite_auth_provider::SqliteAuthProvider;
pub use sqlite_client_repository::SqliteClientRepository;
pub use sqlite_review_repository::SqliteReviewRepository;
pub use sqlite_settings_repository::SqliteSettingsRepository;
pub use sqlite_vendor_repository::SqliteVendorRepository;
