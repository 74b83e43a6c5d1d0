//! Maintenance endpoints.

use axum::Json;
use axum::extract::State;
use savaeat_core::RepairReport;

use crate::auth::AuthUser;
use crate::error::HttpError;
use crate::state::AppState;

/// Reconcile both sides of every like.
pub async fn repair_likes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RepairReport>, HttpError> {
    let report = state.core.likes().repair_likes().await?;
    tracing::info!(
        target: "savaeat.http",
        principal_id = %auth.principal_id(),
        clean = report.is_clean(),
        "like repair requested"
    );
    Ok(Json(report))
}
