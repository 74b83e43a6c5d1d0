//! Authentication provider port.
//!
//! The seam for whatever service owns credentials. Profiles live in the
//! vendor and client repositories; the provider only knows principals.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Principal, Role, Session};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("account not found: {0}")]
    NotFound(String),

    #[error("auth storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account. Emails are unique, compared case-insensitively.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Principal, AuthError>;

    /// Delete an account and all of its sessions.
    async fn remove_account(&self, principal_id: &str) -> Result<(), AuthError>;

    /// Check credentials and open a new session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Close a session. Unknown tokens are ignored.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// The principal behind a token, or `None` if the token is not live.
    async fn verify_session(&self, token: &str) -> Result<Option<Principal>, AuthError>;
}
