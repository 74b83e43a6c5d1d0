use async_trait::async_trait;

use super::RepositoryError;
use crate::settings::Settings;

/// Whole-document storage for the marketplace [`Settings`].
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// The stored settings, or `Settings::with_defaults()` when nothing has
    /// been saved yet.
    async fn load(&self) -> Result<Settings, RepositoryError>;

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError>;
}
