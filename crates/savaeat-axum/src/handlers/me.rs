//! The signed-in caller.

use axum::Json;
use axum::extract::State;
use savaeat_core::{CurrentUser, Vendor};

use crate::auth::AuthUser;
use crate::dto::FavoritesQuery;
use crate::error::HttpError;
use crate::extract::ApiQuery;
use crate::state::AppState;

/// Who the bearer token belongs to, with their profile.
pub async fn current(auth: AuthUser) -> Json<CurrentUser> {
    Json(auth.user)
}

/// The caller's favorite vendors, optionally filtered by name.
pub async fn favorites(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<FavoritesQuery>,
) -> Result<Json<Vec<Vendor>>, HttpError> {
    let role = auth.role()?;
    let vendors = state
        .core
        .likes()
        .favorites(auth.principal_id(), role, &query.q)
        .await?;
    Ok(Json(vendors))
}
