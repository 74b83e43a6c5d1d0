//! Registration, sign-in and sign-out.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use savaeat_core::RegisterRequest;

use crate::auth::AuthUser;
use crate::dto::{AuthResponse, LoginBody, RegisterResponse};
use crate::error::HttpError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Create an account and its profile, then sign the new user in.
///
/// The token is left out when the account was created but the session
/// could not be opened.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), HttpError> {
    let (user, session) = state.core.accounts().register_and_sign_in(&req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token: session.map(|s| s.token),
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<AuthResponse>, HttpError> {
    let session = state
        .core
        .accounts()
        .sign_in(&body.email, &body.password)
        .await?;
    let user = state
        .core
        .identity()
        .current_user(&session.token)
        .await?
        .ok_or_else(|| HttpError::Unauthorized("session was not created".to_string()))?;

    Ok(Json(AuthResponse {
        token: session.token,
        user,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, HttpError> {
    state.core.accounts().sign_out(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
