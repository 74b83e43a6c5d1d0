//! In-memory port implementations for service tests.
//!
//! One `MemoryStore` backs every repository port plus the auth provider.
//! Individual operations can be made to fail with `fail("vendors.set_rating")`
//! to exercise compensation paths. Reads and aggregate writes yield to the
//! scheduler first so that unserialized read-modify-write sequences would
//! interleave under concurrency.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{
    Client, ClientProfile, NewReview, Principal, RatingAggregate, Review, Role, Session, Vendor,
    VendorProfile,
};
use crate::events::AppEvent;
use crate::ports::{
    AppEventEmitter, AuthError, AuthProvider, ClientRepository, Repos, RepositoryError,
    ReviewRepository, SettingsRepository, VendorRepository,
};
use crate::settings::Settings;

#[derive(Default)]
pub struct MemoryStore {
    pub vendors: Mutex<HashMap<String, Vendor>>,
    pub clients: Mutex<HashMap<String, Client>>,
    pub reviews: Mutex<HashMap<String, Review>>,
    settings: Mutex<Option<Settings>>,
    accounts: Mutex<HashMap<String, (Principal, String)>>,
    sessions: Mutex<HashMap<String, Session>>,
    failing: Mutex<HashSet<&'static str>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repos(self: &Arc<Self>) -> Repos {
        Repos::new(
            Arc::clone(self) as Arc<dyn VendorRepository>,
            Arc::clone(self) as Arc<dyn ClientRepository>,
            Arc::clone(self) as Arc<dyn ReviewRepository>,
            Arc::clone(self) as Arc<dyn SettingsRepository>,
        )
    }

    /// Make every subsequent call of `op` fail with a storage error.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn heal(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    fn check(&self, op: &'static str) -> Result<(), RepositoryError> {
        if self.failing.lock().unwrap().contains(op) {
            return Err(RepositoryError::Storage(format!("injected failure: {op}")));
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn seed_vendor(&self, id: &str, name: &str, lat: f64, lng: f64) -> Vendor {
        let vendor = Vendor::new(id, vendor_profile(name, lat, lng), 1_700_000_000_000);
        self.vendors
            .lock()
            .unwrap()
            .insert(id.to_string(), vendor.clone());
        vendor
    }

    pub fn seed_client(&self, id: &str, name: &str) -> Client {
        let client = Client::new(id, client_profile(name), 1_700_000_000_000);
        self.clients
            .lock()
            .unwrap()
            .insert(id.to_string(), client.clone());
        client
    }

    /// Register an account directly, bypassing profile creation.
    pub fn seed_account(&self, id: &str, email: &str, password: &str, role: Option<Role>) {
        let principal = Principal {
            id: id.to_string(),
            email: email.to_string(),
            role,
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(id.to_string(), (principal, password.to_string()));
    }

    pub fn vendor(&self, id: &str) -> Vendor {
        self.vendors.lock().unwrap().get(id).cloned().unwrap()
    }

    pub fn client(&self, id: &str) -> Client {
        self.clients.lock().unwrap().get(id).cloned().unwrap()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    fn with_vendor<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Vendor) -> T,
    ) -> Result<T, RepositoryError> {
        let mut vendors = self.vendors.lock().unwrap();
        let vendor = vendors
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("vendor {id}")))?;
        Ok(f(vendor))
    }

    fn with_client<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Client) -> T,
    ) -> Result<T, RepositoryError> {
        let mut clients = self.clients.lock().unwrap();
        let client = clients
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("client {id}")))?;
        Ok(f(client))
    }
}

pub fn vendor_profile(name: &str, lat: f64, lng: f64) -> VendorProfile {
    VendorProfile {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        profile_image_url: "/placeholder.png".to_string(),
        banner_image_url: String::new(),
        description: String::new(),
        shop_name: format!("Chez {name}"),
        address: "Lomé".to_string(),
        latitude: lat,
        longitude: lng,
        phone_number: "+228 90 00 00 00".to_string(),
    }
}

pub fn client_profile(name: &str) -> ClientProfile {
    ClientProfile {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        profile_image_url: "/placeholder.png".to_string(),
        banner_image_url: String::new(),
    }
}

#[async_trait]
impl VendorRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Vendor>, RepositoryError> {
        self.check("vendors.list")?;
        let mut vendors: Vec<Vendor> = self.vendors.lock().unwrap().values().cloned().collect();
        vendors.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(vendors)
    }

    async fn get_by_id(&self, id: &str) -> Result<Vendor, RepositoryError> {
        tokio::task::yield_now().await;
        self.check("vendors.get")?;
        self.vendors
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("vendor {id}")))
    }

    async fn insert(&self, vendor: &Vendor) -> Result<(), RepositoryError> {
        self.check("vendors.insert")?;
        let mut vendors = self.vendors.lock().unwrap();
        if vendors.contains_key(&vendor.id) {
            return Err(RepositoryError::AlreadyExists(vendor.id.clone()));
        }
        vendors.insert(vendor.id.clone(), vendor.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &str,
        profile: &VendorProfile,
    ) -> Result<(), RepositoryError> {
        self.check("vendors.update_profile")?;
        self.with_vendor(id, |v| {
            let kept = v.clone();
            *v = Vendor {
                id: kept.id,
                created_at: kept.created_at,
                average_rating: kept.average_rating,
                ratings_count: kept.ratings_count,
                liked_by: kept.liked_by,
                favorite_vendors: kept.favorite_vendors,
                ..Vendor::new("", profile.clone(), 0)
            };
        })
    }

    async fn set_rating(
        &self,
        id: &str,
        aggregate: RatingAggregate,
    ) -> Result<(), RepositoryError> {
        tokio::task::yield_now().await;
        self.check("vendors.set_rating")?;
        self.with_vendor(id, |v| {
            v.average_rating = aggregate.average;
            v.ratings_count = aggregate.count;
        })
    }

    async fn add_liker(&self, id: &str, liker_id: &str) -> Result<(), RepositoryError> {
        self.check("vendors.add_liker")?;
        self.with_vendor(id, |v| {
            v.liked_by.insert(liker_id.to_string());
        })
    }

    async fn remove_liker(&self, id: &str, liker_id: &str) -> Result<(), RepositoryError> {
        self.check("vendors.remove_liker")?;
        self.with_vendor(id, |v| {
            v.liked_by.remove(liker_id);
        })
    }

    async fn add_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError> {
        self.check("vendors.add_favorite")?;
        self.with_vendor(id, |v| {
            v.favorite_vendors.insert(vendor_id.to_string());
        })
    }

    async fn remove_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError> {
        self.check("vendors.remove_favorite")?;
        self.with_vendor(id, |v| {
            v.favorite_vendors.remove(vendor_id);
        })
    }
}

#[async_trait]
impl ClientRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        self.check("clients.list")?;
        let mut clients: Vec<Client> = self.clients.lock().unwrap().values().cloned().collect();
        clients.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(clients)
    }

    async fn get_by_id(&self, id: &str) -> Result<Client, RepositoryError> {
        tokio::task::yield_now().await;
        self.check("clients.get")?;
        self.clients
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("client {id}")))
    }

    async fn insert(&self, client: &Client) -> Result<(), RepositoryError> {
        self.check("clients.insert")?;
        let mut clients = self.clients.lock().unwrap();
        if clients.contains_key(&client.id) {
            return Err(RepositoryError::AlreadyExists(client.id.clone()));
        }
        clients.insert(client.id.clone(), client.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &str,
        profile: &ClientProfile,
    ) -> Result<(), RepositoryError> {
        self.check("clients.update_profile")?;
        self.with_client(id, |c| {
            c.name.clone_from(&profile.name);
            c.email.clone_from(&profile.email);
            c.profile_image_url.clone_from(&profile.profile_image_url);
            c.banner_image_url.clone_from(&profile.banner_image_url);
        })
    }

    async fn add_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError> {
        self.check("clients.add_favorite")?;
        self.with_client(id, |c| {
            c.favorite_vendors.insert(vendor_id.to_string());
        })
    }

    async fn remove_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError> {
        self.check("clients.remove_favorite")?;
        self.with_client(id, |c| {
            c.favorite_vendors.remove(vendor_id);
        })
    }

    async fn add_review_id(&self, id: &str, review_id: &str) -> Result<(), RepositoryError> {
        self.check("clients.add_review_id")?;
        self.with_client(id, |c| {
            c.review_ids.insert(review_id.to_string());
        })
    }

    async fn remove_review_id(&self, id: &str, review_id: &str) -> Result<(), RepositoryError> {
        self.check("clients.remove_review_id")?;
        self.with_client(id, |c| {
            c.review_ids.remove(review_id);
        })
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn create(&self, review: &NewReview) -> Result<Review, RepositoryError> {
        self.check("reviews.create")?;
        let created = Review {
            id: self.next_id("review"),
            author_id: review.author_id.clone(),
            author_name: review.author_name.clone(),
            vendor_id: review.vendor_id.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: review.created_at,
            updated_at: None,
        };
        self.reviews
            .lock()
            .unwrap()
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: &str) -> Result<Review, RepositoryError> {
        self.check("reviews.get")?;
        self.reviews
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("review {id}")))
    }

    async fn list_for_vendor(&self, vendor_id: &str) -> Result<Vec<Review>, RepositoryError> {
        self.check("reviews.list")?;
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.vendor_id == vendor_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }

    async fn update(&self, review: &Review) -> Result<(), RepositoryError> {
        self.check("reviews.update")?;
        let mut reviews = self.reviews.lock().unwrap();
        let stored = reviews
            .get_mut(&review.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("review {}", review.id)))?;
        stored.rating = review.rating;
        stored.comment.clone_from(&review.comment);
        stored.updated_at = review.updated_at;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.check("reviews.delete")?;
        self.reviews
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("review {id}")))
    }

    async fn restore(&self, review: &Review) -> Result<(), RepositoryError> {
        self.check("reviews.restore")?;
        self.reviews
            .lock()
            .unwrap()
            .insert(review.id.clone(), review.clone());
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn load(&self) -> Result<Settings, RepositoryError> {
        self.check("settings.load")?;
        Ok(self
            .settings
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(Settings::with_defaults))
    }

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        self.check("settings.save")?;
        *self.settings.lock().unwrap() = Some(settings.clone());
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for MemoryStore {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Principal, AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|(p, _)| p.email.eq_ignore_ascii_case(email))
        {
            return Err(AuthError::EmailTaken(email.to_string()));
        }
        let principal = Principal {
            id: self.next_id("user"),
            email: email.to_string(),
            role: Some(role),
        };
        accounts.insert(
            principal.id.clone(),
            (principal.clone(), password.to_string()),
        );
        Ok(principal)
    }

    async fn remove_account(&self, principal_id: &str) -> Result<(), AuthError> {
        self.accounts
            .lock()
            .unwrap()
            .remove(principal_id)
            .ok_or_else(|| AuthError::NotFound(principal_id.to_string()))?;
        self.sessions
            .lock()
            .unwrap()
            .retain(|_, s| s.principal_id != principal_id);
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.check("auth.sign_in")
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let principal = self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|(p, pw)| p.email.eq_ignore_ascii_case(email) && pw == password)
            .map(|(p, _)| p.clone())
            .ok_or(AuthError::InvalidCredentials)?;
        let session = Session {
            token: self.next_id("token"),
            principal_id: principal.id,
            created_at: 0,
        };
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }

    async fn verify_session(&self, token: &str) -> Result<Option<Principal>, AuthError> {
        let Some(session) = self.sessions.lock().unwrap().get(token).cloned() else {
            return Ok(None);
        };
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(&session.principal_id)
            .map(|(p, _)| p.clone()))
    }
}

/// Collects emitted events for assertions.
#[derive(Clone, Default)]
pub struct RecordingEmitter {
    events: Arc<Mutex<Vec<AppEvent>>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AppEventEmitter for RecordingEmitter {
    fn emit(&self, event: AppEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}
