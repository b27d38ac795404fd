//! Tag repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{TagId, UserId};
use notehub_entity::tag::Tag;

use super::db_error;
use super::note::uuids;
use crate::traits::TagStore;

const TAG_COLUMNS: &str = "id, owner_id, name, created_at";

/// Repository for tag CRUD.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for TagRepository {
    async fn find_by_id(&self, id: TagId) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>(&format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find tag"))
    }

    async fn find_many(&self, ids: &[TagId]) -> AppResult<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(uuids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load tags"))
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE owner_id = $1 ORDER BY name COLLATE \"C\" ASC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list tags"))
    }

    async fn create(&self, owner: UserId, name: &str) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>(&format!(
            "INSERT INTO tags ({TAG_COLUMNS}) VALUES ($1, $2, $3, $4) RETURNING {TAG_COLUMNS}"
        ))
        .bind(TagId::new())
        .bind(owner)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create tag"))
    }

    async fn rename(&self, id: TagId, name: &str) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>(&format!(
            "UPDATE tags SET name = $2 WHERE id = $1 RETURNING {TAG_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to rename tag"))?
        .ok_or_else(|| AppError::not_found(format!("Tag {id} not found")))
    }

    async fn delete(&self, id: TagId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete tag"))?;
        Ok(result.rows_affected() > 0)
    }
}
