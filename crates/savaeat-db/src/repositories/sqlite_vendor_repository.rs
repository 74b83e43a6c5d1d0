//! `SQLite` implementation of the `VendorRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use savaeat_core::{RatingAggregate, RepositoryError, Vendor, VendorProfile, VendorRepository};

use super::member_sets::{FAVORITE_VENDORS, VENDOR_LIKERS, VENDORS};
use super::row_mappers::{VENDOR_SELECT_COLUMNS, VendorRow, map_sqlx_error, row_to_vendor};

pub struct SqliteVendorRepository {
    pool: SqlitePool,
}

impl SqliteVendorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VendorRepository for SqliteVendorRepository {
    async fn list(&self) -> Result<Vec<Vendor>, RepositoryError> {
        let rows = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {VENDOR_SELECT_COLUMNS} FROM vendors ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut likers = VENDOR_LIKERS.all(&self.pool).await?;
        let mut favorites = FAVORITE_VENDORS.all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let liked_by = likers.remove(&row.id).unwrap_or_default();
                let favorite_vendors = favorites.remove(&row.id).unwrap_or_default();
                row_to_vendor(row, liked_by, favorite_vendors)
            })
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Vendor, RepositoryError> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {VENDOR_SELECT_COLUMNS} FROM vendors WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("vendor {id}")))?;

        let liked_by = VENDOR_LIKERS.members_of(&self.pool, id).await?;
        let favorite_vendors = FAVORITE_VENDORS.members_of(&self.pool, id).await?;
        Ok(row_to_vendor(row, liked_by, favorite_vendors))
    }

    async fn insert(&self, vendor: &Vendor) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO vendors (id, name, email, profile_image_url, banner_image_url, description,
                                 shop_name, address, latitude, longitude, phone_number, created_at,
                                 average_rating, ratings_count)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&vendor.id)
        .bind(&vendor.name)
        .bind(&vendor.email)
        .bind(&vendor.profile_image_url)
        .bind(&vendor.banner_image_url)
        .bind(&vendor.description)
        .bind(&vendor.shop_name)
        .bind(&vendor.address)
        .bind(vendor.latitude)
        .bind(vendor.longitude)
        .bind(&vendor.phone_number)
        .bind(vendor.created_at)
        .bind(vendor.average_rating)
        .bind(i64::from(vendor.ratings_count))
        .execute(&mut *tx)
        .await
        .map_err(|e| match map_sqlx_error(e) {
            RepositoryError::AlreadyExists(_) => RepositoryError::AlreadyExists(vendor.id.clone()),
            other => other,
        })?;

        for liker in &vendor.liked_by {
            sqlx::query("INSERT OR IGNORE INTO vendor_likers (vendor_id, liker_id) VALUES (?, ?)")
                .bind(&vendor.id)
                .bind(liker)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }
        for favorite in &vendor.favorite_vendors {
            sqlx::query("INSERT OR IGNORE INTO favorite_vendors (owner_id, vendor_id) VALUES (?, ?)")
                .bind(&vendor.id)
                .bind(favorite)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn update_profile(
        &self,
        id: &str,
        profile: &VendorProfile,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE vendors
            SET name = ?, email = ?, profile_image_url = ?, banner_image_url = ?, description = ?,
                shop_name = ?, address = ?, latitude = ?, longitude = ?, phone_number = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.profile_image_url)
        .bind(&profile.banner_image_url)
        .bind(&profile.description)
        .bind(&profile.shop_name)
        .bind(&profile.address)
        .bind(profile.latitude)
        .bind(profile.longitude)
        .bind(&profile.phone_number)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("vendor {id}")));
        }
        Ok(())
    }

    async fn set_rating(
        &self,
        id: &str,
        aggregate: RatingAggregate,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE vendors SET average_rating = ?, ratings_count = ? WHERE id = ?")
                .bind(aggregate.average)
                .bind(i64::from(aggregate.count))
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("vendor {id}")));
        }
        Ok(())
    }

    async fn add_liker(&self, id: &str, liker_id: &str) -> Result<(), RepositoryError> {
        VENDOR_LIKERS.add(&self.pool, VENDORS, id, liker_id).await
    }

    async fn remove_liker(&self, id: &str, liker_id: &str) -> Result<(), RepositoryError> {
        VENDOR_LIKERS.remove(&self.pool, VENDORS, id, liker_id).await
    }

    async fn add_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError> {
        FAVORITE_VENDORS.add(&self.pool, VENDORS, id, vendor_id).await
    }

    async fn remove_favorite(&self, id: &str, vendor_id: &str) -> Result<(), RepositoryError> {
        FAVORITE_VENDORS
            .remove(&self.pool, VENDORS, id, vendor_id)
            .await
    }
}
