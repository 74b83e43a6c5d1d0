//! Client domain types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::InvalidInput;
use crate::utils::validation::require_non_empty;

/// A client as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image_url: String,
    pub banner_image_url: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub favorite_vendors: BTreeSet<String>,
    pub review_ids: BTreeSet<String>,
}

impl Client {
    pub fn new(id: impl Into<String>, profile: ClientProfile, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: profile.name,
            email: profile.email,
            profile_image_url: profile.profile_image_url,
            banner_image_url: profile.banner_image_url,
            created_at,
            favorite_vendors: BTreeSet::new(),
            review_ids: BTreeSet::new(),
        }
    }
}

/// Editable client attributes. No id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub banner_image_url: String,
}

impl ClientProfile {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        require_non_empty("name", &self.name)
    }
}
