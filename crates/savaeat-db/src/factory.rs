//! Composition utilities for building `AppCore` with `SQLite` backends.
//!
//! Construction only; no domain logic lives here.

use sqlx::SqlitePool;
use std::sync::Arc;

use savaeat_core::services::AppCore;
use savaeat_core::{AppEventEmitter, AuthProvider, Repos};

use crate::repositories::{
    SqliteAuthProvider, SqliteClientRepository, SqliteReviewRepository, SqliteSettingsRepository,
    SqliteVendorRepository,
};

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Build all `SQLite` repositories from a pool.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos::new(
            Arc::new(SqliteVendorRepository::new(pool.clone())),
            Arc::new(SqliteClientRepository::new(pool.clone())),
            Arc::new(SqliteReviewRepository::new(pool.clone())),
            Arc::new(SqliteSettingsRepository::new(pool)),
        )
    }

    /// The credential store backed by the same database.
    pub fn auth_provider(pool: SqlitePool) -> Arc<dyn AuthProvider> {
        Arc::new(SqliteAuthProvider::new(pool))
    }

    /// Build a complete `AppCore` from a pool and an event sink.
    ///
    /// Routing is not wired here; call `AppCore::with_routing` on the result.
    ///
    /// ```ignore
    /// let pool = setup_database(&db_path).await?;
    /// let core = CoreFactory::build_app_core(pool, Arc::new(broadcaster.clone()));
    /// ```
    pub fn build_app_core(pool: SqlitePool, emitter: Arc<dyn AppEventEmitter>) -> AppCore {
        let repos = Self::build_repos(pool.clone());
        AppCore::new(repos, Self::auth_provider(pool), emitter)
    }
}

/// In-memory database with the production schema, for tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn repos(&self) -> Repos {
        CoreFactory::build_repos(self.pool.clone())
    }

    pub fn auth_provider(&self) -> Arc<dyn AuthProvider> {
        CoreFactory::auth_provider(self.pool.clone())
    }

    /// A full core over this database, with events discarded.
    pub fn app_core(&self) -> AppCore {
        CoreFactory::build_app_core(
            self.pool.clone(),
            Arc::new(savaeat_core::NoopEmitter::new()),
        )
    }
}
