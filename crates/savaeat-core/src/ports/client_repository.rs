//! Client repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Client, ClientProfile};

/// Repository for client documents.
///
/// Same set semantics as `VendorRepository`.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Client>, RepositoryError>;

    async fn get_by_id(&self, id: &str) -> Result<Client, RepositoryError>;

    /// Returns `AlreadyExists` if the id is taken.
    async fn insert(&self, client: &Client) -> Result<(), RepositoryError>;

    async fn update_profile(&self, id: &str, profile: &ClientProfile)
    -> Result<(), RepositoryError>;

    async fn add_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError>;

    async fn remove_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError>;

    async fn add_review_id(&self, id: &str, review_id: &str) -> Result<(), RepositoryError>;

    async fn remove_review_id(&self, id: &str, review_id: &str) -> Result<(), RepositoryError>;
}
