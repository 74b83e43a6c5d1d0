//! Driving directions between two points.

use axum::Json;
use axum::extract::State;

use crate::dto::{DirectionsQuery, RouteDto};
use crate::error::HttpError;
use crate::extract::ApiQuery;
use crate::state::AppState;

pub async fn route(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DirectionsQuery>,
) -> Result<Json<RouteDto>, HttpError> {
    let directions = state.core.directions().ok_or_else(|| {
        HttpError::ServiceUnavailable("routing is not configured".to_string())
    })?;
    let (from, to) = query.endpoints();
    let points = directions.route(from, to).await?;
    Ok(Json(RouteDto { points }))
}
