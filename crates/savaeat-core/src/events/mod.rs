//! Change notifications.
//!
//! Every successful mutation emits one or more `AppEvent`s through the
//! `AppEventEmitter` port. The HTTP adapter streams them as SSE so open pages
//! can refetch what changed.
//!
//! # Wire Format
//!
//! ```json
//! { "type": "rating_changed", "vendorId": "v1", "averageRating": 4.5, "ratingsCount": 2 }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{RatingAggregate, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AppEvent {
    // ========== Profile Events ==========
    VendorUpdated { vendor_id: String },

    ClientUpdated { client_id: String },

    // ========== Review Events ==========
    ReviewAdded {
        vendor_id: String,
        review_id: String,
        rating: u8,
    },

    ReviewUpdated {
        vendor_id: String,
        review_id: String,
        rating: u8,
    },

    ReviewDeleted { vendor_id: String, review_id: String },

    /// A vendor's aggregate changed. Always follows a review event.
    RatingChanged {
        vendor_id: String,
        average_rating: f64,
        ratings_count: u32,
    },

    // ========== Like Events ==========
    LikeToggled {
        vendor_id: String,
        liker_id: String,
        liker_type: Role,
        liked: bool,
    },

    // ========== Account Events ==========
    AccountRegistered { principal_id: String, role: Role },

    /// A session was opened (`signed_in`) or closed.
    PrincipalChanged { principal_id: String, signed_in: bool },
}

impl AppEvent {
    pub fn rating_changed(vendor_id: impl Into<String>, aggregate: RatingAggregate) -> Self {
        Self::RatingChanged {
            vendor_id: vendor_id.into(),
            average_rating: aggregate.average,
            ratings_count: aggregate.count,
        }
    }

    pub fn vendor_updated(vendor_id: impl Into<String>) -> Self {
        Self::VendorUpdated {
            vendor_id: vendor_id.into(),
        }
    }

    pub fn client_updated(client_id: impl Into<String>) -> Self {
        Self::ClientUpdated {
            client_id: client_id.into(),
        }
    }

    /// SSE event name.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::VendorUpdated { .. } => "vendor:updated",
            Self::ClientUpdated { .. } => "client:updated",
            Self::ReviewAdded { .. } => "review:added",
            Self::ReviewUpdated { .. } => "review:updated",
            Self::ReviewDeleted { .. } => "review:deleted",
            Self::RatingChanged { .. } => "rating:changed",
            Self::LikeToggled { .. } => "like:toggled",
            Self::AccountRegistered { .. } => "account:registered",
            Self::PrincipalChanged { .. } => "principal:changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_changed_wire_format() {
        let event = AppEvent::rating_changed("v1", RatingAggregate::new(4.5, 2));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "rating_changed");
        assert_eq!(json["vendorId"], "v1");
        assert_eq!(json["averageRating"], 4.5);
        assert_eq!(json["ratingsCount"], 2);
    }

    #[test]
    fn test_like_toggled_wire_format() {
        let event = AppEvent::LikeToggled {
            vendor_id: "v1".into(),
            liker_id: "c1".into(),
            liker_type: Role::Client,
            liked: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "like_toggled");
        assert_eq!(json["likerType"], "client");
        assert_eq!(json["liked"], true);

        let back: AppEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_event_names_are_namespaced() {
        assert_eq!(AppEvent::vendor_updated("v").event_name(), "vendor:updated");
        assert_eq!(
            AppEvent::PrincipalChanged {
                principal_id: "p".into(),
                signed_in: false
            }
            .event_name(),
            "principal:changed"
        );
    }
}
