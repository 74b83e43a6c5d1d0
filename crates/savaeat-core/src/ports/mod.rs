//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - Repositories expose set add/remove as single atomic operations so that
//!   services never read-modify-write a whole set
//! - Aggregates are written as a pair, never field by field

pub mod auth_provider;
pub mod client_repository;
pub mod event_emitter;
pub mod review_repository;
pub mod routing;
pub mod settings_repository;
pub mod vendor_repository;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::{AggregateError, InvalidInput, Role};

pub use auth_provider::{AuthError, AuthProvider};
pub use client_repository::ClientRepository;
pub use event_emitter::{AppEventEmitter, NoopEmitter};
pub use review_repository::ReviewRepository;
pub use routing::{RoutingError, RoutingPort};
pub use settings_repository::SettingsRepository;
pub use vendor_repository::VendorRepository;

/// Container for all repository trait objects.
///
/// Lives in `savaeat-core` so that `AppCore` can accept it without
/// depending on `savaeat-db`.
///
/// ```ignore
/// let repos = savaeat_db::CoreFactory::build_repos(pool);
/// let core = AppCore::new(repos, auth, emitter);
/// ```
#[derive(Clone)]
pub struct Repos {
    pub vendors: Arc<dyn VendorRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Repos {
    pub fn new(
        vendors: Arc<dyn VendorRepository>,
        clients: Arc<dyn ClientRepository>,
        reviews: Arc<dyn ReviewRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            vendors,
            clients,
            reviews,
            settings,
        }
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A constraint was violated (e.g., foreign key, unique constraint).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepositoryError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// The collection a missing entity was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Vendor,
    Client,
    Review,
    Account,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vendor => "vendor",
            Self::Client => "client",
            Self::Review => "review",
            Self::Account => "account",
        })
    }
}

impl From<Role> for EntityKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Client => Self::Client,
            Role::Vendor => Self::Vendor,
        }
    }
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (HTTP status codes, exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Invalid input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request conflicts with existing state (e.g. email already taken).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing, invalid or expired credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Repository operation failed; the store is unavailable.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Stored state contradicts the operation (e.g. an update on a vendor
    /// with zero ratings).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A multi-step write failed half way and could not be rolled back.
    #[error("Partial write during {operation}: {detail}")]
    PartialWrite { operation: String, detail: String },

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),
}

impl CoreError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn partial_write(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::PartialWrite {
            operation: operation.into(),
            detail: detail.into(),
        }
    }
}

impl From<InvalidInput> for CoreError {
    fn from(err: InvalidInput) -> Self {
        Self::Validation(err.0)
    }
}

impl From<AggregateError> for CoreError {
    fn from(err: AggregateError) -> Self {
        Self::InvariantViolation(err.to_string())
    }
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::EmailTaken(email) => {
                Self::Conflict(format!("an account already exists for {email}"))
            }
            AuthError::NotFound(id) => Self::not_found(EntityKind::Account, id),
            AuthError::Storage(msg) => Self::Repository(RepositoryError::Storage(msg)),
        }
    }
}

impl From<RoutingError> for CoreError {
    fn from(err: RoutingError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

/// Maps a repository lookup failure, turning `NotFound` into a typed
/// `CoreError::NotFound` for `kind`.
pub(crate) fn lookup_error(kind: EntityKind, id: &str) -> impl FnOnce(RepositoryError) -> CoreError {
    let id = id.to_string();
    move |err| match err {
        RepositoryError::NotFound(_) => CoreError::NotFound { kind, id },
        other => CoreError::Repository(other),
    }
}
