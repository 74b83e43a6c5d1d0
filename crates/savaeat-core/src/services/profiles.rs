//! Profile read/write gateways.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Client, ClientProfile, Role, UserProfile, Vendor, VendorProfile};
use crate::events::AppEvent;
use crate::ports::{
    AppEventEmitter, ClientRepository, CoreError, EntityKind, VendorRepository, lookup_error,
};

/// Fetch and save vendor and client profiles.
///
/// Saves write only the editable attributes; aggregates and like sets are
/// owned by other services and are never part of a save.
pub struct ProfileService {
    vendors: Arc<dyn VendorRepository>,
    clients: Arc<dyn ClientRepository>,
    emitter: Arc<dyn AppEventEmitter>,
}

impl ProfileService {
    pub fn new(
        vendors: Arc<dyn VendorRepository>,
        clients: Arc<dyn ClientRepository>,
        emitter: Arc<dyn AppEventEmitter>,
    ) -> Self {
        Self {
            vendors,
            clients,
            emitter,
        }
    }

    pub async fn fetch_vendor(&self, id: &str) -> Result<Vendor, CoreError> {
        self.vendors
            .get_by_id(id)
            .await
            .map_err(lookup_error(EntityKind::Vendor, id))
    }

    pub async fn fetch_client(&self, id: &str) -> Result<Client, CoreError> {
        self.clients
            .get_by_id(id)
            .await
            .map_err(lookup_error(EntityKind::Client, id))
    }

    /// Fetch whichever profile `role` says the id belongs to.
    pub async fn fetch_user(&self, id: &str, role: Role) -> Result<UserProfile, CoreError> {
        Ok(match role {
            Role::Vendor => UserProfile::Vendor(self.fetch_vendor(id).await?),
            Role::Client => UserProfile::Client(self.fetch_client(id).await?),
        })
    }

    pub async fn save_vendor(&self, id: &str, profile: &VendorProfile) -> Result<Vendor, CoreError> {
        profile.validate()?;
        self.vendors
            .update_profile(id, profile)
            .await
            .map_err(lookup_error(EntityKind::Vendor, id))?;

        info!(target: "savaeat.profiles", vendor_id = id, "vendor profile saved");
        self.emitter.emit(AppEvent::vendor_updated(id));
        self.fetch_vendor(id).await
    }

    pub async fn save_client(&self, id: &str, profile: &ClientProfile) -> Result<Client, CoreError> {
        profile.validate()?;
        self.clients
            .update_profile(id, profile)
            .await
            .map_err(lookup_error(EntityKind::Client, id))?;

        info!(target: "savaeat.profiles", client_id = id, "client profile saved");
        self.emitter.emit(AppEvent::client_updated(id));
        self.fetch_client(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RatingAggregate;
    use crate::services::test_support::{
        MemoryStore, RecordingEmitter, client_profile, vendor_profile,
    };

    fn setup() -> (Arc<MemoryStore>, RecordingEmitter, ProfileService) {
        let store = MemoryStore::new();
        let emitter = RecordingEmitter::new();
        let repos = store.repos();
        let profiles = ProfileService::new(repos.vendors, repos.clients, Arc::new(emitter.clone()));
        (store, emitter, profiles)
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let (_, _, profiles) = setup();
        assert!(matches!(
            profiles.fetch_vendor("nope").await.unwrap_err(),
            CoreError::NotFound {
                kind: EntityKind::Vendor,
                ..
            }
        ));
        assert!(matches!(
            profiles.fetch_client("nope").await.unwrap_err(),
            CoreError::NotFound {
                kind: EntityKind::Client,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_save_vendor_keeps_maintained_fields() {
        let (store, emitter, profiles) = setup();
        store.seed_vendor("v1", "Mama Afi", 6.1850, 1.3520);
        {
            let mut vendors = store.vendors.lock().unwrap();
            let v = vendors.get_mut("v1").unwrap();
            v.average_rating = 4.5;
            v.ratings_count = 2;
            v.liked_by.insert("c1".to_string());
        }

        let mut edit = vendor_profile("Mama Afi", 6.1900, 1.3600);
        edit.description = "Nouveau menu".to_string();
        let saved = profiles.save_vendor("v1", &edit).await.unwrap();

        assert_eq!(saved.id, "v1");
        assert_eq!(saved.description, "Nouveau menu");
        assert_eq!(saved.latitude, 6.1900);
        assert_eq!(saved.aggregate(), RatingAggregate::new(4.5, 2));
        assert!(saved.is_liked_by("c1"));
        assert_eq!(emitter.events(), vec![AppEvent::vendor_updated("v1")]);
    }

    #[tokio::test]
    async fn test_save_vendor_validates() {
        let (store, emitter, profiles) = setup();
        store.seed_vendor("v1", "Mama Afi", 6.1850, 1.3520);

        let bad = vendor_profile("Mama Afi", 95.0, 1.0);
        assert!(matches!(
            profiles.save_vendor("v1", &bad).await.unwrap_err(),
            CoreError::Validation(_)
        ));
        let blank = vendor_profile("", 6.0, 1.0);
        assert!(matches!(
            profiles.save_vendor("v1", &blank).await.unwrap_err(),
            CoreError::Validation(_)
        ));
        assert_eq!(store.vendor("v1").latitude, 6.1850);
        assert!(emitter.events().is_empty());
    }

    #[tokio::test]
    async fn test_save_unknown_client() {
        let (_, _, profiles) = setup();
        let err = profiles
            .save_client("ghost", &client_profile("Kossi"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::NotFound {
                kind: EntityKind::Client,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_save_client_and_fetch_user() {
        let (store, _, profiles) = setup();
        store.seed_client("c1", "Kossi");

        let mut edit = client_profile("Kossi Mensah");
        edit.banner_image_url = "https://img/banner.jpg".to_string();
        profiles.save_client("c1", &edit).await.unwrap();

        let user = profiles.fetch_user("c1", Role::Client).await.unwrap();
        assert_eq!(user.role(), Role::Client);
        assert_eq!(user.name(), "Kossi Mensah");
        assert!(profiles.fetch_user("c1", Role::Vendor).await.is_err());
    }
}
