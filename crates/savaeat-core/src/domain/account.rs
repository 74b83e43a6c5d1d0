//! Accounts, sessions, roles and the shapes built on top of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::InvalidInput;
use super::client::{Client, ClientProfile};
use super::vendor::{Vendor, VendorProfile};
use crate::utils::validation::{require_non_empty, valid_latitude, valid_longitude};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Which profile collection an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Vendor,
}

/// The kind of account on the liking side of a like. Vendors can like vendors.
pub type LikerType = Role;

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Vendor => "vendor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "vendor" => Ok(Self::Vendor),
            other => Err(InvalidInput::new(format!("unknown role: {other}"))),
        }
    }
}

/// Outcome of role resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedRole {
    Vendor,
    Client,
    /// Signed in, but no profile document exists in either collection.
    Unknown,
}

impl From<Role> for ResolvedRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Client => Self::Client,
            Role::Vendor => Self::Vendor,
        }
    }
}

/// An authenticated account.
///
/// `role` is `None` for accounts created before roles were recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Option<Role>,
}

/// An opaque bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub principal_id: String,
    pub created_at: i64,
}

/// Either profile kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserProfile {
    Vendor(Vendor),
    Client(Client),
}

impl UserProfile {
    pub fn id(&self) -> &str {
        match self {
            Self::Vendor(v) => &v.id,
            Self::Client(c) => &c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Vendor(v) => &v.name,
            Self::Client(c) => &c.name,
        }
    }

    pub const fn role(&self) -> Role {
        match self {
            Self::Vendor(_) => Role::Vendor,
            Self::Client(_) => Role::Client,
        }
    }
}

/// The signed-in user as the pages see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub principal_id: String,
    pub role: ResolvedRole,
    pub profile: Option<UserProfile>,
}

/// Sign-up form.
///
/// Vendor-only fields are optional on the wire and checked by `validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub banner_image_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        require_non_empty("name", &self.name)?;
        require_non_empty("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(InvalidInput::new("email is not a valid address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(InvalidInput::new(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        require_non_empty("profileImageUrl", &self.profile_image_url)?;
        require_non_empty("bannerImageUrl", &self.banner_image_url)?;

        if self.role == Role::Vendor {
            require_non_empty("shopName", self.shop_name.as_deref().unwrap_or_default())?;
            require_non_empty("address", self.address.as_deref().unwrap_or_default())?;
            require_non_empty(
                "phoneNumber",
                self.phone_number.as_deref().unwrap_or_default(),
            )?;
            match (self.latitude, self.longitude) {
                (Some(lat), Some(lng)) if valid_latitude(lat) && valid_longitude(lng) => {}
                (Some(_), Some(_)) => {
                    return Err(InvalidInput::new("vendor location is out of range"));
                }
                _ => return Err(InvalidInput::new("vendor location is required")),
            }
        }
        Ok(())
    }

    pub fn client_profile(&self) -> ClientProfile {
        ClientProfile {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            profile_image_url: self.profile_image_url.clone(),
            banner_image_url: self.banner_image_url.clone(),
        }
    }

    /// Vendor profile built from the form. Call `validate` first.
    pub fn vendor_profile(&self) -> VendorProfile {
        VendorProfile {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            profile_image_url: self.profile_image_url.clone(),
            banner_image_url: self.banner_image_url.clone(),
            description: self.description.clone().unwrap_or_default(),
            shop_name: self.shop_name.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
            latitude: self.latitude.unwrap_or_default(),
            longitude: self.longitude.unwrap_or_default(),
            phone_number: self.phone_number.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    pub liked: bool,
}

/// What a like reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub vendors_scanned: usize,
    /// `likedBy` entries pointing at accounts that no longer exist.
    pub dangling_likes_removed: usize,
    /// Back-references added to a liker's `favoriteVendors`.
    pub favorites_added: usize,
    /// `favoriteVendors` entries the vendor side did not confirm.
    pub favorites_removed: usize,
}

impl RepairReport {
    pub const fn is_clean(&self) -> bool {
        self.dangling_likes_removed == 0 && self.favorites_added == 0 && self.favorites_removed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_request() -> RegisterRequest {
        RegisterRequest {
            role: Role::Client,
            name: "Kossi".to_string(),
            email: "kossi@example.com".to_string(),
            password: "secret1".to_string(),
            profile_image_url: "https://img/p.png".to_string(),
            banner_image_url: "https://img/b.png".to_string(),
            description: None,
            shop_name: None,
            address: None,
            phone_number: None,
            latitude: None,
            longitude: None,
        }
    }

    fn vendor_request() -> RegisterRequest {
        RegisterRequest {
            role: Role::Vendor,
            shop_name: Some("Chez Afi".to_string()),
            address: Some("Bè".to_string()),
            phone_number: Some("+228".to_string()),
            latitude: Some(6.18),
            longitude: Some(1.35),
            ..client_request()
        }
    }

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("vendor".parse::<Role>().unwrap(), Role::Vendor);
        assert_eq!(Role::Client.to_string(), "client");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_client_registration_validation() {
        assert!(client_request().validate().is_ok());

        let short = RegisterRequest {
            password: "12345".to_string(),
            ..client_request()
        };
        assert!(short.validate().is_err());

        let no_banner = RegisterRequest {
            banner_image_url: String::new(),
            ..client_request()
        };
        assert!(no_banner.validate().is_err());
    }

    #[test]
    fn test_vendor_registration_requires_shop_fields() {
        assert!(vendor_request().validate().is_ok());

        let no_shop = RegisterRequest {
            shop_name: None,
            ..vendor_request()
        };
        assert!(no_shop.validate().is_err());

        let no_location = RegisterRequest {
            longitude: None,
            ..vendor_request()
        };
        assert!(no_location.validate().is_err());

        let bad_location = RegisterRequest {
            latitude: Some(120.0),
            ..vendor_request()
        };
        assert!(bad_location.validate().is_err());
    }

    #[test]
    fn test_vendor_profile_from_request() {
        let profile = vendor_request().vendor_profile();
        assert_eq!(profile.shop_name, "Chez Afi");
        assert_eq!(profile.description, "");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_resolved_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ResolvedRole::Unknown).unwrap(),
            serde_json::json!("unknown")
        );
    }
}
