//! `SQLite` implementation of the `ClientRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use savaeat_core::{Client, ClientProfile, ClientRepository, RepositoryError};

use super::member_sets::{CLIENT_REVIEWS, CLIENTS, FAVORITE_VENDORS};
use super::row_mappers::{CLIENT_SELECT_COLUMNS, ClientRow, map_sqlx_error, row_to_client};

pub struct SqliteClientRepository {
    pool: SqlitePool,
}

impl SqliteClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        let rows = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_SELECT_COLUMNS} FROM clients ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut favorites = FAVORITE_VENDORS.all(&self.pool).await?;
        let mut reviews = CLIENT_REVIEWS.all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let favorite_vendors = favorites.remove(&row.id).unwrap_or_default();
                let review_ids = reviews.remove(&row.id).unwrap_or_default();
                row_to_client(row, favorite_vendors, review_ids)
            })
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_SELECT_COLUMNS} FROM clients WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("client {id}")))?;

        let favorite_vendors = FAVORITE_VENDORS.members_of(&self.pool, id).await?;
        let review_ids = CLIENT_REVIEWS.members_of(&self.pool, id).await?;
        Ok(row_to_client(row, favorite_vendors, review_ids))
    }

    async fn insert(&self, client: &Client) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO clients (id, name, email, profile_image_url, banner_image_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.profile_image_url)
        .bind(&client.banner_image_url)
        .bind(client.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match map_sqlx_error(e) {
            RepositoryError::AlreadyExists(_) => RepositoryError::AlreadyExists(client.id.clone()),
            other => other,
        })?;

        for favorite in &client.favorite_vendors {
            sqlx::query("INSERT OR IGNORE INTO favorite_vendors (owner_id, vendor_id) VALUES (?, ?)")
                .bind(&client.id)
                .bind(favorite)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }
        for review_id in &client.review_ids {
            sqlx::query("INSERT OR IGNORE INTO client_reviews (client_id, review_id) VALUES (?, ?)")
                .bind(&client.id)
                .bind(review_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn update_profile(
        &self,
        id: &str,
        profile: &ClientProfile,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE clients SET name = ?, email = ?, profile_image_url = ?, banner_image_url = ? WHERE id = ?",
        )
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.profile_image_url)
        .bind(&profile.banner_image_url)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("client {id}")));
        }
        Ok(())
    }

    async fn add_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError> {
        FAVORITE_VENDORS.add(&self.pool, CLIENTS, id, vendor_id).await
    }

    async fn remove_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError> {
        FAVORITE_VENDORS
            .remove(&self.pool, CLIENTS, id, vendor_id)
            .await
    }

    async fn add_review_id(&self, id: &str, review_id: &str) -> Result<(), RepositoryError> {
        CLIENT_REVIEWS.add(&self.pool, CLIENTS, id, review_id).await
    }

    async fn remove_review_id(&self, id: &str, review_id: &str) -> Result<(), RepositoryError> {
        CLIENT_REVIEWS
            .remove(&self.pool, CLIENTS, id, review_id)
            .await
    }
}
