use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::Comment;
use crate::error::{is_foreign_key_violation, is_unique_violation, AppError, Result};
use crate::repository::traits::EngagementStore;

/// PostgreSQL-backed like/comment store.
///
/// Every mutation updates the owning photo's denormalized counter in the
/// same transaction, keeping the counter invariant intact.
#[derive(Clone)]
pub struct EngagementRepository {
    pool: PgPool,
}

impl EngagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngagementStore for EngagementRepository {
    async fn like(&self, user_id: i64, photo_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO likes (user_id, photo_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(photo_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("photo {} is already liked", photo_id))
            } else if is_foreign_key_violation(&e) {
                AppError::NotFound(format!("photo {} does not exist", photo_id))
            } else {
                e.into()
            }
        })?;

        sqlx::query("UPDATE photos SET like_count = like_count + 1 WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn unlike(&self, user_id: i64, photo_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND photo_id = $2
            "#,
        )
        .bind(user_id)
        .bind(photo_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // Bailing out before the decrement leaves the counter untouched
        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "photo {} is not liked",
                photo_id
            )));
        }

        sqlx::query("UPDATE photos SET like_count = like_count - 1 WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn has_liked(&self, user_id: i64, photo_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND photo_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(photo_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn likers(&self, photo_id: i64) -> Result<Vec<i64>> {
        let likers: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT user_id FROM likes
            WHERE photo_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(likers)
    }

    async fn comment(&self, photo_id: i64, owner_id: i64, content: &str) -> Result<Comment> {
        let mut tx = self.pool.begin().await?;

        let comment_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (owner_id, photo_id, content)
            VALUES ($1, $2, $3)
            RETURNING comment_id
            "#,
        )
        .bind(owner_id)
        .bind(photo_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound(format!("photo {} does not exist", photo_id))
            } else {
                AppError::from(e)
            }
        })?;

        sqlx::query("UPDATE photos SET comments_count = comments_count + 1 WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        let owner_username: String =
            sqlx::query_scalar("SELECT username FROM users WHERE user_id = $1")
                .bind(owner_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(Comment {
            comment_id,
            photo_id,
            owner_id,
            owner_username,
            content: content.to_string(),
        })
    }

    async fn uncomment(&self, photo_id: i64, comment_id: i64, owner_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Delete only on an exact author/photo match
        let affected = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE comment_id = $1 AND owner_id = $2 AND photo_id = $3
            "#,
        )
        .bind(comment_id)
        .bind(owner_id)
        .bind(photo_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "comment {} does not exist on photo {}",
                comment_id, photo_id
            )));
        }

        sqlx::query("UPDATE photos SET comments_count = comments_count - 1 WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn comments_of(&self, photo_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.comment_id, c.photo_id, c.owner_id,
                   u.username AS owner_username, c.content
            FROM comments c
            INNER JOIN users u ON u.user_id = c.owner_id
            WHERE c.photo_id = $1
            ORDER BY c.comment_id
            "#,
        )
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
