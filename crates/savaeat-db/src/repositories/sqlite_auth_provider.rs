//! `SQLite` implementation of the `AuthProvider` port.
//!
//! Passwords are stored as Argon2id PHC strings, which carry their own salt
//! and parameters. Hashing runs on the blocking pool. Sessions are random
//! tokens without expiry.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use savaeat_core::{AuthError, AuthProvider, Principal, Role, Session};

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    password_hash: String,
    role: Option<String>,
}

impl AccountRow {
    fn into_principal(self) -> Principal {
        // Unknown role strings are treated like accounts without a role.
        let role = self.role.as_deref().and_then(|r| r.parse::<Role>().ok());
        Principal {
            id: self.id,
            email: self.email,
            role,
        }
    }
}

fn storage(e: sqlx::Error) -> AuthError {
    AuthError::Storage(e.to_string())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Storage(format!("password hashing failed: {e}")))
}

/// Constant-time check of `password` against a stored PHC string.
fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Checked for unknown emails so they cost as much as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("savaeat-unknown-account").ok());

async fn off_runtime<T, F>(work: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Storage(format!("password task failed: {e}")))
}

pub struct SqliteAuthProvider {
    pool: SqlitePool,
}

impl SqliteAuthProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<AccountRow>, AuthError> {
        sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password_hash, role FROM accounts WHERE email = ?",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)
    }
}

#[async_trait]
impl AuthProvider for SqliteAuthProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Principal, AuthError> {
        let email = email.trim();
        if self.account_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken(email.to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let password = password.to_string();
        let hash = off_runtime(move || hash_password(&password)).await??;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(email)
        .bind(&hash)
        .bind(role.as_str())
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // A racing registration with the same email loses here.
            if e.to_string().contains("UNIQUE constraint failed") {
                AuthError::EmailTaken(email.to_string())
            } else {
                storage(e)
            }
        })?;

        tracing::debug!(target: "savaeat.auth", principal_id = %id, role = %role, "account created");
        Ok(Principal {
            id,
            email: email.to_string(),
            role: Some(role),
        })
    }

    async fn remove_account(&self, principal_id: &str) -> Result<(), AuthError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query("DELETE FROM sessions WHERE principal_id = ?")
            .bind(principal_id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(principal_id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(principal_id.to_string()));
        }
        tx.commit().await.map_err(storage)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account = self.account_by_email(email).await?;
        let stored = account.as_ref().map(|a| a.password_hash.clone());
        let password = password.to_string();
        let verified = off_runtime(move || {
            let stored = stored.or_else(|| (*DUMMY_HASH).clone()).unwrap_or_default();
            verify_password(&password, &stored)
        })
        .await?;

        let account = match account {
            Some(account) if verified => account,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            principal_id: account.id,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        sqlx::query("INSERT INTO sessions (token, principal_id, created_at) VALUES (?, ?, ?)")
            .bind(&session.token)
            .bind(&session.principal_id)
            .bind(session.created_at)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(session)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn verify_session(&self, token: &str) -> Result<Option<Principal>, AuthError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT a.id, a.email, a.password_hash, a.role
            FROM sessions s JOIN accounts a ON a.id = s.principal_id
            WHERE s.token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(row.map(AccountRow::into_principal))
    }
}
