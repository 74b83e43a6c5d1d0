//! Vendor handlers: directory, profile, reviews, likes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use savaeat_core::{
    LikeOutcome, NearbyVendor, RatingAggregate, Review, ReviewWithAuthor, Vendor, VendorProfile,
    VendorWithReviews,
};

use crate::auth::AuthUser;
use crate::dto::{NearbyQuery, ReviewBody};
use crate::error::HttpError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Vendors near a point, nearest first.
pub async fn nearby(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NearbyQuery>,
) -> Result<Json<Vec<NearbyVendor>>, HttpError> {
    let directory = state.core.directory();
    let radius_km = match query.radius_km {
        Some(radius) => radius,
        None => directory.default_radius_km().await?,
    };
    let vendors = directory
        .find_vendors(query.origin(), radius_km, &query.q)
        .await?;
    Ok(Json(vendors))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vendor>, HttpError> {
    Ok(Json(state.core.profiles().fetch_vendor(&id).await?))
}

/// Save the caller's own vendor profile.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(profile): ApiJson<VendorProfile>,
) -> Result<Json<Vendor>, HttpError> {
    auth.require_self(&id)?;
    Ok(Json(state.core.profiles().save_vendor(&id, &profile).await?))
}

pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReviewWithAuthor>>, HttpError> {
    Ok(Json(state.core.reviews().reviews_for_vendor(&id).await?))
}

pub async fn with_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VendorWithReviews>, HttpError> {
    Ok(Json(state.core.reviews().vendor_with_reviews(&id).await?))
}

/// Post a review as the caller. Vendors cannot review their own shop.
pub async fn add_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(vendor_id): Path<String>,
    ApiJson(body): ApiJson<ReviewBody>,
) -> Result<(StatusCode, Json<Review>), HttpError> {
    let author = auth.profile()?;
    if author.id() == vendor_id {
        return Err(HttpError::Forbidden(
            "vendors cannot review their own shop".to_string(),
        ));
    }

    let review = state
        .core
        .ratings()
        .add_review(
            &vendor_id,
            author.id(),
            author.name(),
            body.rating,
            &body.comment,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Look up a review and make sure the caller wrote it.
async fn own_review(state: &AppState, auth: &AuthUser, review_id: &str) -> Result<(), HttpError> {
    let review = state.core.reviews().get(review_id).await?;
    if review.author_id != auth.principal_id() {
        return Err(HttpError::Forbidden(
            "you can only change your own reviews".to_string(),
        ));
    }
    Ok(())
}

pub async fn update_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((vendor_id, review_id)): Path<(String, String)>,
    ApiJson(body): ApiJson<ReviewBody>,
) -> Result<Json<Review>, HttpError> {
    own_review(&state, &auth, &review_id).await?;
    let review = state
        .core
        .ratings()
        .update_review(&review_id, &vendor_id, body.rating, &body.comment)
        .await?;
    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((vendor_id, review_id)): Path<(String, String)>,
) -> Result<StatusCode, HttpError> {
    own_review(&state, &auth, &review_id).await?;
    state
        .core
        .ratings()
        .delete_review(&review_id, &vendor_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Like the vendor if the caller hasn't yet, unlike otherwise.
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(vendor_id): Path<String>,
) -> Result<Json<LikeOutcome>, HttpError> {
    let role = auth.role()?;
    let outcome = state
        .core
        .likes()
        .toggle_like(&vendor_id, auth.principal_id(), role)
        .await?;
    Ok(Json(outcome))
}

/// Rebuild the vendor's aggregate from its reviews.
pub async fn recompute_aggregate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(vendor_id): Path<String>,
) -> Result<Json<RatingAggregate>, HttpError> {
    Ok(Json(
        state.core.ratings().recompute_aggregate(&vendor_id).await?,
    ))
}
