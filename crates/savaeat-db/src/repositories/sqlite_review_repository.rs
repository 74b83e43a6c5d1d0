//! `SQLite` implementation of the `ReviewRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use savaeat_core::{NewReview, RepositoryError, Review, ReviewRepository};

use super::row_mappers::{REVIEW_SELECT_COLUMNS, ReviewRow, map_sqlx_error, row_to_review};

pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    async fn create(&self, review: &NewReview) -> Result<Review, RepositoryError> {
        let created = Review {
            id: Uuid::new_v4().to_string(),
            author_id: review.author_id.clone(),
            author_name: review.author_name.clone(),
            vendor_id: review.vendor_id.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: review.created_at,
            updated_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO reviews (id, author_id, author_name, vendor_id, rating, comment, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(&created.id)
        .bind(&created.author_id)
        .bind(&created.author_name)
        .bind(&created.vendor_id)
        .bind(i64::from(created.rating))
        .bind(&created.comment)
        .bind(created.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(created)
    }

    async fn get_by_id(&self, id: &str) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_SELECT_COLUMNS} FROM reviews WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("review {id}")))?;

        row_to_review(row)
    }

    async fn list_for_vendor(&self, vendor_id: &str) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_SELECT_COLUMNS} FROM reviews WHERE vendor_id = ? ORDER BY created_at DESC, id"
        ))
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(row_to_review).collect()
    }

    async fn update(&self, review: &Review) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE reviews SET rating = ?, comment = ?, updated_at = ? WHERE id = ?")
                .bind(i64::from(review.rating))
                .bind(&review.comment)
                .bind(review.updated_at)
                .bind(&review.id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("review {}", review.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("review {id}")));
        }
        Ok(())
    }

    async fn restore(&self, review: &Review) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO reviews (id, author_id, author_name, vendor_id, rating, comment, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&review.id)
        .bind(&review.author_id)
        .bind(&review.author_name)
        .bind(&review.vendor_id)
        .bind(i64::from(review.rating))
        .bind(&review.comment)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;

    fn new_review(vendor_id: &str, rating: u8, created_at: i64) -> NewReview {
        NewReview {
            author_id: "c1".to_string(),
            author_name: "Kossi".to_string(),
            vendor_id: vendor_id.to_string(),
            rating,
            comment: "Très bon garba".to_string(),
            created_at,
        }
    }

    async fn repo() -> SqliteReviewRepository {
        SqliteReviewRepository::new(setup_test_database().await.unwrap())
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let repo = repo().await;
        let a = repo.create(&new_review("v1", 4, 1)).await.unwrap();
        let b = repo.create(&new_review("v1", 4, 1)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.get_by_id(&a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn test_list_for_vendor_newest_first() {
        let repo = repo().await;
        let old = repo.create(&new_review("v1", 2, 100)).await.unwrap();
        let new = repo.create(&new_review("v1", 5, 200)).await.unwrap();
        repo.create(&new_review("v2", 3, 300)).await.unwrap();

        let listed = repo.list_for_vendor("v1").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![new.id.as_str(), old.id.as_str()]);
    }

    #[tokio::test]
    async fn test_update_delete_and_restore() {
        let repo = repo().await;
        let original = repo.create(&new_review("v1", 2, 100)).await.unwrap();

        let edited = Review {
            rating: 5,
            comment: "Finalement excellent".to_string(),
            updated_at: Some(150),
            ..original.clone()
        };
        repo.update(&edited).await.unwrap();
        assert_eq!(repo.get_by_id(&original.id).await.unwrap(), edited);

        // Undo the edit.
        repo.restore(&original).await.unwrap();
        assert_eq!(repo.get_by_id(&original.id).await.unwrap(), original);

        repo.delete(&original.id).await.unwrap();
        assert!(repo.delete(&original.id).await.unwrap_err().is_not_found());

        // Undo the delete, id preserved.
        repo.restore(&original).await.unwrap();
        assert_eq!(repo.get_by_id(&original.id).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_update_missing_review_is_not_found() {
        let repo = repo().await;
        let ghost = Review {
            id: "ghost".to_string(),
            author_id: "c1".to_string(),
            author_name: "Kossi".to_string(),
            vendor_id: "v1".to_string(),
            rating: 3,
            comment: String::new(),
            created_at: 0,
            updated_at: Some(1),
        };
        assert!(repo.update(&ghost).await.unwrap_err().is_not_found());
    }
}
