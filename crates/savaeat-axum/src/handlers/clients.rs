//! Client profile handlers.

use axum::Json;
use axum::extract::{Path, State};
use savaeat_core::{Client, ClientProfile};

use crate::auth::AuthUser;
use crate::error::HttpError;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, HttpError> {
    Ok(Json(state.core.profiles().fetch_client(&id).await?))
}

/// Save the caller's own client profile.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(profile): ApiJson<ClientProfile>,
) -> Result<Json<Client>, HttpError> {
    auth.require_self(&id)?;
    Ok(Json(state.core.profiles().save_client(&id, &profile).await?))
}
