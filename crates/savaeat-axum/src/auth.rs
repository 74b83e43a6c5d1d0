//! Bearer-token authentication extractor.
//!
//! Handlers that take an [`AuthUser`] only run for requests carrying
//! `Authorization: Bearer <session token>` that resolves to a live session.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use savaeat_core::{CurrentUser, Role, UserProfile};

use crate::error::HttpError;
use crate::state::AppState;

/// The signed-in caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub token: String,
    pub user: CurrentUser,
}

impl AuthUser {
    pub fn principal_id(&self) -> &str {
        &self.user.principal_id
    }

    /// The caller's profile, or 403 for accounts with no profile document.
    pub fn profile(&self) -> Result<&UserProfile, HttpError> {
        self.user.profile.as_ref().ok_or_else(|| {
            HttpError::Forbidden("this account has no vendor or client profile".to_string())
        })
    }

    pub fn role(&self) -> Result<Role, HttpError> {
        self.profile().map(UserProfile::role)
    }

    /// Rejects callers acting on someone else's document.
    pub fn require_self(&self, id: &str) -> Result<(), HttpError> {
        if self.principal_id() == id {
            Ok(())
        } else {
            Err(HttpError::Forbidden(
                "you can only change your own profile".to_string(),
            ))
        }
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| HttpError::Unauthorized("sign in required".to_string()))?
            .to_string();

        let user = state
            .core
            .identity()
            .current_user(&token)
            .await?
            .ok_or_else(|| HttpError::Unauthorized("session expired or unknown".to_string()))?;

        tracing::debug!(
            target: "savaeat.auth",
            principal_id = %user.principal_id,
            role = ?user.role,
            "request authenticated"
        );
        Ok(Self { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savaeat_core::{Client, ClientProfile, ResolvedRole};

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("bearer  abc123 "), Some("abc123"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc123"), None);
    }

    fn caller(profile: Option<UserProfile>) -> AuthUser {
        AuthUser {
            token: "t".to_string(),
            user: CurrentUser {
                principal_id: "c1".to_string(),
                role: if profile.is_some() {
                    ResolvedRole::Client
                } else {
                    ResolvedRole::Unknown
                },
                profile,
            },
        }
    }

    #[test]
    fn test_unknown_role_is_forbidden() {
        let err = caller(None).role().unwrap_err();
        assert!(matches!(err, HttpError::Forbidden(_)));
    }

    #[test]
    fn test_require_self() {
        let client = Client::new(
            "c1",
            ClientProfile {
                name: "Kossi".to_string(),
                email: String::new(),
                profile_image_url: String::new(),
                banner_image_url: String::new(),
            },
            0,
        );
        let auth = caller(Some(UserProfile::Client(client)));
        assert_eq!(auth.role().unwrap(), Role::Client);
        assert!(auth.require_self("c1").is_ok());
        assert!(matches!(
            auth.require_self("c2"),
            Err(HttpError::Forbidden(_))
        ));
    }
}
