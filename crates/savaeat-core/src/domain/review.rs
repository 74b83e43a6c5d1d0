//! Review domain types.

use serde::{Deserialize, Serialize};

use super::InvalidInput;
use super::vendor::Vendor;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A stored review.
///
/// `author_name` is copied at write time and not kept in sync with later
/// profile edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub vendor_id: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// A review about to be created. The repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub author_id: String,
    pub author_name: String,
    pub vendor_id: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
}

/// Checks a rating and comment, returning the trimmed comment.
pub fn validate_review_input(
    rating: u8,
    comment: &str,
    max_comment_length: usize,
) -> Result<String, InvalidInput> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(InvalidInput::new(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(InvalidInput::new("comment must not be empty"));
    }
    if comment.chars().count() > max_comment_length {
        return Err(InvalidInput::new(format!(
            "comment must be at most {max_comment_length} characters"
        )));
    }
    Ok(comment.to_string())
}

/// Who wrote a review, resolved from the client or vendor collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub profile_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    /// `None` when the author no longer has a profile.
    pub author: Option<AuthorSummary>,
}

/// The vendor page payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorWithReviews {
    pub vendor: Vendor,
    pub reviews: Vec<ReviewWithAuthor>,
}
