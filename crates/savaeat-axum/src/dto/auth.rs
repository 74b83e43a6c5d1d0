//! Sign-in request and session response.

use savaeat_core::CurrentUser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Returned by login: the bearer token plus who it belongs to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: CurrentUser,
}

/// Returned by register. `token` is absent when the first sign-in failed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: CurrentUser,
}
