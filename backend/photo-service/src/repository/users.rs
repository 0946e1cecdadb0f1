use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::User;
use crate::error::{is_unique_violation, AppError, Result};
use crate::repository::traits::UserStore;

/// PostgreSQL-backed user directory
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn get_or_create(&self, username: &str) -> Result<User> {
        // ON CONFLICT DO NOTHING keeps concurrent duplicate calls from
        // erroring; the follow-up select covers the lost-insert race.
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            ON CONFLICT (username) DO NOTHING
            RETURNING user_id, username
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(user) = inserted {
            return Ok(user);
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn by_username(&self, username: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", username)))
    }

    async fn by_id(&self, user_id: i64) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", user_id)))
    }

    async fn rename(&self, user_id: i64, new_username: &str) -> Result<User> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2
            WHERE user_id = $1
            RETURNING user_id, username
            "#,
        )
        .bind(user_id)
        .bind(new_username)
        .fetch_optional(&self.pool)
        .await;

        match updated {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AppError::NotFound(format!(
                "user {} does not exist",
                user_id
            ))),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
                "username {} is already taken",
                new_username
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<User>> {
        let offset = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(page_size))
            .ok_or_else(|| AppError::InvalidInput("page is out of range".to_string()))?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username FROM users
            ORDER BY user_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
