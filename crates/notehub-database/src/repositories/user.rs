//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::UserId;
use notehub_entity::user::User;

use super::db_error;
use crate::traits::UserDirectory;

const USER_COLUMNS: &str = "id, username, created_at";

/// Repository for the user rows that anchor ownership.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn exists(&self, id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to check user existence"))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find user by username"))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username COLLATE \"C\" ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list users"))
    }

    async fn create(&self, username: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(UserId::new())
        .bind(username)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create user"))
    }

    async fn rename(&self, id: UserId, username: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to rename user"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        // Folders and tags cascade from the user row; notes and links
        // cascade from those.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}
