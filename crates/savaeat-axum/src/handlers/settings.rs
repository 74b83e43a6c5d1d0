//! Settings handlers.

use axum::Json;
use axum::extract::State;
use savaeat_core::{Settings, SettingsUpdate};

use crate::auth::AuthUser;
use crate::error::HttpError;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn get(State(state): State<AppState>) -> Result<Json<Settings>, HttpError> {
    Ok(Json(state.core.settings().get().await?))
}

/// Partial update; any signed-in account may change settings.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SettingsUpdate>,
) -> Result<Json<Settings>, HttpError> {
    let settings = state.core.settings().update(req).await?;
    tracing::info!(
        target: "savaeat.http",
        principal_id = %auth.principal_id(),
        "settings updated"
    );
    Ok(Json(settings))
}
