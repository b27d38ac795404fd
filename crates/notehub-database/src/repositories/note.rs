//! Note repository implementation, including the tag-set queries.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{FolderId, NoteId, TagId, UserId};
use notehub_entity::note::{CreateNote, Note, NoteDetail, NoteSummary};
use notehub_entity::tag::TagBrief;

use super::db_error;
use crate::traits::NoteStore;

const NOTE_COLUMNS: &str = "id, folder_id, title, content, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "n.id, n.title, n.folder_id, n.updated_at";

/// One tag of one note, as loaded for a batch of notes.
#[derive(Debug, FromRow)]
struct NoteTagRow {
    note_id: NoteId,
    id: TagId,
    name: String,
}

/// Repository for notes and the note listings used by tag filtering.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    /// Create a new note repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Link `note` to every tag in `tag_ids` on an open connection.
    async fn link_tags(conn: &mut PgConnection, note: NoteId, tag_ids: &[TagId]) -> AppResult<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO note_tags (note_id, tag_id) \
             SELECT $1, UNNEST($2::uuid[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(note)
        .bind(uuids(tag_ids))
        .execute(conn)
        .await
        .map_err(db_error("Failed to link note tags"))?;
        Ok(())
    }
}

/// Convert typed tag IDs into the array bound to `uuid[]` parameters.
pub(crate) fn uuids(tag_ids: &[TagId]) -> Vec<Uuid> {
    tag_ids.iter().map(|id| id.into_uuid()).collect()
}

#[async_trait]
impl NoteStore for NoteRepository {
    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>> {
        sqlx::query_as::<_, Note>(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find note"))
    }

    async fn find_detail(&self, id: NoteId) -> AppResult<Option<NoteDetail>> {
        let Some(note) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let tags = sqlx::query_as::<_, TagBrief>(
            "SELECT t.id, t.name FROM tags t \
             INNER JOIN note_tags nt ON nt.tag_id = t.id \
             WHERE nt.note_id = $1 \
             ORDER BY t.name COLLATE \"C\" ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load note tags"))?;

        Ok(Some(NoteDetail { note, tags }))
    }

    async fn create(&self, data: CreateNote, tag_ids: &[TagId]) -> AppResult<Note> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin note transaction"))?;

        let now = Utc::now();
        let note = sqlx::query_as::<_, Note>(&format!(
            "INSERT INTO notes ({NOTE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(NoteId::new())
        .bind(data.folder_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to create note"))?;

        Self::link_tags(&mut tx, note.id, tag_ids).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit note"))?;
        Ok(note)
    }

    async fn update(&self, id: NoteId, data: CreateNote, tag_ids: &[TagId]) -> AppResult<Note> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin note transaction"))?;

        let note = sqlx::query_as::<_, Note>(&format!(
            "UPDATE notes SET folder_id = $2, title = $3, content = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(data.folder_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to update note"))?
        .ok_or_else(|| AppError::not_found(format!("Note {id} not found")))?;

        sqlx::query("DELETE FROM note_tags WHERE note_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to clear note tags"))?;

        Self::link_tags(&mut tx, id, tag_ids).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit note"))?;
        Ok(note)
    }

    async fn delete(&self, id: NoteId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete note"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_folder(&self, folder: FolderId) -> AppResult<Vec<NoteSummary>> {
        sqlx::query_as::<_, NoteSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM notes n WHERE n.folder_id = $1 \
             ORDER BY n.updated_at DESC, n.id ASC"
        ))
        .bind(folder)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list folder notes"))
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<NoteSummary>> {
        sqlx::query_as::<_, NoteSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM notes n \
             INNER JOIN folders f ON f.id = n.folder_id \
             WHERE f.owner_id = $1 \
             ORDER BY n.updated_at DESC, n.id ASC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list user notes"))
    }

    async fn list_details_by_owner(&self, owner: UserId) -> AppResult<Vec<NoteDetail>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT n.id, n.folder_id, n.title, n.content, n.created_at, n.updated_at \
             FROM notes n \
             INNER JOIN folders f ON f.id = n.folder_id \
             WHERE f.owner_id = $1 \
             ORDER BY n.updated_at DESC, n.id ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list user notes"))?;

        let note_ids: Vec<Uuid> = notes.iter().map(|n| n.id.into_uuid()).collect();
        let rows = sqlx::query_as::<_, NoteTagRow>(
            "SELECT nt.note_id, t.id, t.name FROM note_tags nt \
             INNER JOIN tags t ON t.id = nt.tag_id \
             WHERE nt.note_id = ANY($1) \
             ORDER BY t.name COLLATE \"C\" ASC",
        )
        .bind(note_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load note tags"))?;

        let mut tags_by_note: HashMap<NoteId, Vec<TagBrief>> = HashMap::new();
        for row in rows {
            tags_by_note.entry(row.note_id).or_default().push(TagBrief {
                id: row.id,
                name: row.name,
            });
        }

        Ok(notes
            .into_iter()
            .map(|note| {
                let tags = tags_by_note.remove(&note.id).unwrap_or_default();
                NoteDetail { note, tags }
            })
            .collect())
    }

    async fn list_by_any_tag(&self, owner: UserId, tags: &[TagId]) -> AppResult<Vec<NoteSummary>> {
        sqlx::query_as::<_, NoteSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM notes n \
             INNER JOIN folders f ON f.id = n.folder_id \
             WHERE f.owner_id = $1 \
               AND EXISTS ( \
                   SELECT 1 FROM note_tags nt \
                   WHERE nt.note_id = n.id AND nt.tag_id = ANY($2) \
               ) \
             ORDER BY n.updated_at DESC, n.id ASC"
        ))
        .bind(owner)
        .bind(uuids(tags))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to filter notes by any tag"))
    }

    async fn list_by_all_tags(
        &self,
        owner: UserId,
        tags: &[TagId],
    ) -> AppResult<Vec<NoteSummary>> {
        sqlx::query_as::<_, NoteSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM notes n \
             INNER JOIN folders f ON f.id = n.folder_id \
             INNER JOIN note_tags nt ON nt.note_id = n.id \
             WHERE f.owner_id = $1 AND nt.tag_id = ANY($2) \
             GROUP BY n.id \
             HAVING COUNT(DISTINCT nt.tag_id) = $3 \
             ORDER BY n.updated_at DESC, n.id ASC"
        ))
        .bind(owner)
        .bind(uuids(tags))
        .bind(tags.len() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to filter notes by all tags"))
    }
}
