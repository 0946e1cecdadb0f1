use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::Photo;
use crate::error::{is_foreign_key_violation, AppError, Result};
use crate::repository::traits::PhotoStore;

/// PostgreSQL-backed photo store
#[derive(Clone)]
pub struct PhotoRepository {
    pool: PgPool,
}

impl PhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoStore for PhotoRepository {
    async fn upload(
        &self,
        owner_id: i64,
        image: Vec<u8>,
        mime_type: &str,
        caption: &str,
    ) -> Result<Photo> {
        let (photo_id, upload_time): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO photos (owner_id, image, mime_type, caption)
            VALUES ($1, $2, $3, $4)
            RETURNING photo_id, upload_time
            "#,
        )
        .bind(owner_id)
        .bind(&image)
        .bind(mime_type)
        .bind(caption)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound(format!("user {} does not exist", owner_id))
            } else {
                AppError::from(e)
            }
        })?;

        let owner_username: String =
            sqlx::query_scalar("SELECT username FROM users WHERE user_id = $1")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(Photo {
            photo_id,
            owner_id,
            owner_username,
            image,
            mime_type: mime_type.to_string(),
            caption: caption.to_string(),
            upload_time,
            like_count: 0,
            comments_count: 0,
        })
    }

    async fn delete(&self, photo_id: i64, requester_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let owner_id: Option<i64> =
            sqlx::query_scalar("SELECT owner_id FROM photos WHERE photo_id = $1")
                .bind(photo_id)
                .fetch_optional(&mut *tx)
                .await?;

        let owner_id = owner_id
            .ok_or_else(|| AppError::NotFound(format!("photo {} does not exist", photo_id)))?;

        if owner_id != requester_id {
            return Err(AppError::Forbidden(
                "only the owner can delete a photo".to_string(),
            ));
        }

        // Manual cascade: comments and likes first, then the photo
        sqlx::query("DELETE FROM comments WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM likes WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM photos WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, photo_id: i64) -> Result<Photo> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT p.photo_id, p.owner_id, u.username AS owner_username,
                   p.image, p.mime_type, p.caption, p.upload_time,
                   p.like_count, p.comments_count
            FROM photos p
            INNER JOIN users u ON u.user_id = p.owner_id
            WHERE p.photo_id = $1
            "#,
        )
        .bind(photo_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("photo {} does not exist", photo_id)))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Photo>> {
        // Newest first; id-descending tie-break keeps the order total
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT p.photo_id, p.owner_id, u.username AS owner_username,
                   p.image, p.mime_type, p.caption, p.upload_time,
                   p.like_count, p.comments_count
            FROM photos p
            INNER JOIN users u ON u.user_id = p.owner_id
            WHERE p.owner_id = $1
            ORDER BY p.upload_time DESC, p.photo_id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
