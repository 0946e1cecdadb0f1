use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::User;
use crate::error::{is_foreign_key_violation, is_unique_violation, AppError, Result};
use crate::repository::traits::GraphStore;

/// PostgreSQL-backed follow/ban edge store
#[derive(Clone)]
pub struct GraphRepository {
    pool: PgPool,
}

impl GraphRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GraphStore for GraphRepository {
    async fn follow(&self, follower_id: i64, following_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("already following user {}", following_id))
            } else if is_foreign_key_violation(&e) {
                AppError::NotFound("user does not exist".to_string())
            } else {
                e.into()
            }
        })?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<()> {
        let affected = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $1 AND following_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "not following user {}",
                following_id
            )));
        }
        Ok(())
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.username
            FROM follows f
            INNER JOIN users u ON u.user_id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY u.user_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.username
            FROM follows f
            INNER JOIN users u ON u.user_id = f.following_id
            WHERE f.follower_id = $1
            ORDER BY u.user_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn followers_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE following_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn following_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn is_following(&self, follower_id: i64, following_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follows
                WHERE follower_id = $1 AND following_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn ban(&self, user_id: i64, target_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO bans (user_id, banned_user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("user {} is already banned", target_id))
            } else if is_foreign_key_violation(&e) {
                AppError::NotFound("user does not exist".to_string())
            } else {
                e.into()
            }
        })?;

        // Break the follow relationship regardless of direction
        sqlx::query(
            r#"
            DELETE FROM follows
            WHERE (follower_id = $1 AND following_id = $2)
               OR (follower_id = $2 AND following_id = $1)
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?;

        // Remove the target's comments on the requester's photos, keeping
        // the denormalized counters in step with the deleted rows
        sqlx::query(
            r#"
            WITH removed AS (
                DELETE FROM comments c
                USING photos p
                WHERE c.photo_id = p.photo_id
                  AND p.owner_id = $1
                  AND c.owner_id = $2
                RETURNING c.photo_id
            )
            UPDATE photos
            SET comments_count = comments_count - r.cnt
            FROM (SELECT photo_id, COUNT(*) AS cnt FROM removed GROUP BY photo_id) r
            WHERE photos.photo_id = r.photo_id
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?;

        // Same for the target's likes on the requester's photos
        sqlx::query(
            r#"
            WITH removed AS (
                DELETE FROM likes l
                USING photos p
                WHERE l.photo_id = p.photo_id
                  AND p.owner_id = $1
                  AND l.user_id = $2
                RETURNING l.photo_id
            )
            UPDATE photos
            SET like_count = like_count - r.cnt
            FROM (SELECT photo_id, COUNT(*) AS cnt FROM removed GROUP BY photo_id) r
            WHERE photos.photo_id = r.photo_id
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn unban(&self, user_id: i64, target_id: i64) -> Result<()> {
        let affected = sqlx::query(
            r#"
            DELETE FROM bans
            WHERE user_id = $1 AND banned_user_id = $2
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "user {} is not in the ban list",
                target_id
            )));
        }
        Ok(())
    }

    async fn is_banned(&self, user_id: i64, target_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bans
                WHERE user_id = $1 AND banned_user_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn banned(&self, user_id: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.username
            FROM bans b
            INNER JOIN users u ON u.user_id = b.banned_user_id
            WHERE b.user_id = $1
            ORDER BY u.user_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn banned_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bans WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
