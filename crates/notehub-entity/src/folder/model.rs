//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notehub_core::types::{FolderId, UserId};

/// Name given to every user's synthetic root folder.
pub const ROOT_FOLDER_NAME: &str = "root";

/// A folder in a user's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The owning user.
    pub owner_id: UserId,
    /// Parent folder ID (null only for the root).
    pub parent_id: Option<FolderId>,
    /// Folder name, unique among its siblings.
    pub name: String,
    /// Whether this is the user's synthetic root.
    pub is_root: bool,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last renamed or moved.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Build the root folder for `owner`.
    pub fn new_root(owner_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: FolderId::new(),
            owner_id,
            parent_id: None,
            name: ROOT_FOLDER_NAME.to_string(),
            is_root: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether `user` owns this folder.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }
}

/// Data required to create a new non-root folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The owning user.
    pub owner_id: UserId,
    /// Parent folder; always resolved before insert.
    pub parent_id: FolderId,
    /// Folder name.
    pub name: String,
}

impl CreateFolder {
    /// Materialize the row that will be inserted.
    pub fn into_folder(self) -> Folder {
        let now = Utc::now();
        Folder {
            id: FolderId::new(),
            owner_id: self.owner_id,
            parent_id: Some(self.parent_id),
            name: self.name,
            is_root: false,
            created_at: now,
            updated_at: now,
        }
    }
}
