//! Note to tag association repository.

use async_trait::async_trait;
use sqlx::PgPool;

use notehub_core::result::AppResult;
use notehub_core::types::{NoteId, TagId};

use super::db_error;
use crate::traits::NoteTagStore;

/// Repository for individual note/tag links.
///
/// Both sides are foreign keys with `ON DELETE CASCADE`, so a link can
/// never outlive its note or its tag.
#[derive(Debug, Clone)]
pub struct NoteTagRepository {
    pool: PgPool,
}

impl NoteTagRepository {
    /// Create a new note-tag repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteTagStore for NoteTagRepository {
    async fn attach(&self, note: NoteId, tag: TagId) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO note_tags (note_id, tag_id) VALUES ($1, $2) \
             ON CONFLICT (note_id, tag_id) DO NOTHING",
        )
        .bind(note)
        .bind(tag)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to attach tag"))?;
        Ok(())
    }

    async fn detach(&self, note: NoteId, tag: TagId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM note_tags WHERE note_id = $1 AND tag_id = $2")
            .bind(note)
            .bind(tag)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to detach tag"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn tag_ids_for_note(&self, note: NoteId) -> AppResult<Vec<TagId>> {
        sqlx::query_scalar::<_, TagId>(
            "SELECT tag_id FROM note_tags WHERE note_id = $1 ORDER BY tag_id ASC",
        )
        .bind(note)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list note tags"))
    }
}
