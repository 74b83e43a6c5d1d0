//! Marketplace settings: directory radii and the review comment limit.

use std::sync::Arc;

use tracing::info;

use crate::ports::{CoreError, SettingsRepository};
use crate::settings::{Settings, SettingsUpdate, validate_settings};

pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self) -> Result<Settings, CoreError> {
        Ok(self.repo.load().await?)
    }

    /// Merge `update` into the stored settings and save the result.
    ///
    /// Nothing is written when the merged settings fail validation.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings, CoreError> {
        let mut settings = self.repo.load().await?;
        settings.merge(&update);
        validate_settings(&settings)?;
        self.repo.save(&settings).await?;

        info!(
            target: "savaeat.settings",
            default_radius_km = settings.effective_default_radius_km(),
            max_radius_km = settings.effective_max_radius_km(),
            max_comment_length = settings.effective_max_comment_length(),
            "settings saved"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::MemoryStore;

    #[tokio::test]
    async fn test_get_default_settings() {
        let store = MemoryStore::new();
        let service = SettingsService::new(store.repos().settings);

        let settings = service.get().await.unwrap();
        assert_eq!(settings.default_radius_km, Some(5.0));
    }

    #[tokio::test]
    async fn test_update_settings() {
        let store = MemoryStore::new();
        let service = SettingsService::new(store.repos().settings);

        let update = SettingsUpdate {
            max_radius_km: Some(Some(20.0)),
            ..Default::default()
        };
        let updated = service.update(update).await.unwrap();
        assert_eq!(updated.max_radius_km, Some(20.0));

        // Verify persisted
        let fetched = service.get().await.unwrap();
        assert_eq!(fetched.max_radius_km, Some(20.0));
    }

    #[tokio::test]
    async fn test_invalid_update_is_not_saved() {
        let store = MemoryStore::new();
        let service = SettingsService::new(store.repos().settings);

        let update = SettingsUpdate {
            max_radius_km: Some(Some(2.0)),
            ..Default::default()
        };
        assert!(matches!(
            service.update(update).await.unwrap_err(),
            CoreError::Settings(_)
        ));
        assert_eq!(service.get().await.unwrap().max_radius_km, Some(50.0));
    }
}
