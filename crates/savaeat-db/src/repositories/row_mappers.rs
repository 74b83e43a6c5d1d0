//! Row types and mapping helpers for `SQLite` queries.
//!
//! Stored documents may predate fields added later, so every mapper fills
//! gaps with defaults instead of failing.

use std::collections::{BTreeSet, HashMap};

use savaeat_core::{Client, PLACEHOLDER_IMAGE_URL, RepositoryError, Review, Vendor};

/// Shared SELECT column list for vendor queries.
pub const VENDOR_SELECT_COLUMNS: &str = "id, name, email, profile_image_url, banner_image_url, description, shop_name, address, latitude, longitude, phone_number, created_at, average_rating, ratings_count";

/// Shared SELECT column list for client queries.
pub const CLIENT_SELECT_COLUMNS: &str =
    "id, name, email, profile_image_url, banner_image_url, created_at";

/// Shared SELECT column list for review queries.
pub const REVIEW_SELECT_COLUMNS: &str =
    "id, author_id, author_name, vendor_id, rating, comment, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub struct VendorRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub description: String,
    pub shop_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone_number: String,
    pub created_at: i64,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<i64>,
}

#[derive(sqlx::FromRow)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub created_at: i64,
}

#[derive(sqlx::FromRow)]
pub struct ReviewRow {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub vendor_id: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// `(owner, member)` pairs from a join table.
#[derive(sqlx::FromRow)]
pub struct MemberRow {
    pub owner: String,
    pub member: String,
}

/// Map `SQLx` errors to `RepositoryError`.
pub fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed") {
        return RepositoryError::AlreadyExists(msg);
    }
    if msg.contains("constraint failed") {
        return RepositoryError::Constraint(msg);
    }
    RepositoryError::Storage(msg)
}

/// Empty or missing image URLs fall back to the placeholder.
pub fn image_or_placeholder(url: Option<String>) -> String {
    match url {
        Some(url) if !url.trim().is_empty() => url,
        _ => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}

/// Group join-table rows by owner.
pub fn group_members(rows: Vec<MemberRow>) -> HashMap<String, BTreeSet<String>> {
    let mut grouped: HashMap<String, BTreeSet<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.owner).or_default().insert(row.member);
    }
    grouped
}

pub fn row_to_vendor(
    row: VendorRow,
    liked_by: BTreeSet<String>,
    favorite_vendors: BTreeSet<String>,
) -> Vendor {
    let ratings_count = row
        .ratings_count
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(0);
    let average_rating = if ratings_count == 0 {
        0.0
    } else {
        row.average_rating.unwrap_or(0.0)
    };

    Vendor {
        id: row.id,
        name: row.name,
        email: row.email,
        profile_image_url: image_or_placeholder(row.profile_image_url),
        banner_image_url: image_or_placeholder(row.banner_image_url),
        description: row.description,
        shop_name: row.shop_name,
        address: row.address,
        latitude: row.latitude,
        longitude: row.longitude,
        phone_number: row.phone_number,
        created_at: row.created_at,
        average_rating,
        ratings_count,
        liked_by,
        favorite_vendors,
    }
}

pub fn row_to_client(
    row: ClientRow,
    favorite_vendors: BTreeSet<String>,
    review_ids: BTreeSet<String>,
) -> Client {
    Client {
        id: row.id,
        name: row.name,
        email: row.email,
        profile_image_url: image_or_placeholder(row.profile_image_url),
        banner_image_url: image_or_placeholder(row.banner_image_url),
        created_at: row.created_at,
        favorite_vendors,
        review_ids,
    }
}

pub fn row_to_review(row: ReviewRow) -> Result<Review, RepositoryError> {
    let rating = u8::try_from(row.rating).map_err(|_| {
        RepositoryError::Serialization(format!(
            "review {} has out-of-range rating {}",
            row.id, row.rating
        ))
    })?;

    Ok(Review {
        id: row.id,
        author_id: row.author_id,
        author_name: row.author_name,
        vendor_id: row.vendor_id,
        rating,
        comment: row.comment,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
