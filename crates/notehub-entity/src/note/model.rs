//! Note entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notehub_core::types::{FolderId, NoteId};

use crate::tag::TagBrief;

/// A note stored in exactly one folder.
///
/// The owning user is derived through the folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Note {
    /// Unique note identifier.
    pub id: NoteId,
    /// The folder holding this note.
    pub folder_id: FolderId,
    /// Note title.
    pub title: String,
    /// Free-form body.
    pub content: String,
    /// When the note was created.
    pub created_at: DateTime<Utc>,
    /// When the note was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Project the note into its list representation.
    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id,
            title: self.title.clone(),
            folder_id: self.folder_id,
            updated_at: self.updated_at,
        }
    }
}

/// Lightweight note projection returned by list and filter queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NoteSummary {
    /// Note ID.
    pub id: NoteId,
    /// Note title.
    pub title: String,
    /// Owning folder.
    pub folder_id: FolderId,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A note together with its tags (sorted by name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDetail {
    /// The note row.
    #[serde(flatten)]
    pub note: Note,
    /// Attached tags.
    pub tags: Vec<TagBrief>,
}

/// Data written when creating or updating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    /// Target folder.
    pub folder_id: FolderId,
    /// Note title.
    pub title: String,
    /// Note body.
    pub content: String,
}

/// Order summaries the way every note listing is returned: most recently
/// updated first, ties broken by ascending id.
pub fn sort_recent_first(notes: &mut [NoteSummary]) {
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
}
