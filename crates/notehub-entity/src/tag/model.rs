//! Tag entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notehub_core::types::{TagId, UserId};

/// A user-owned label that can be attached to any of the user's notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Unique tag identifier.
    pub id: TagId,
    /// The owning user.
    pub owner_id: UserId,
    /// Tag name, unique per owner.
    pub name: String,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Check whether `user` owns this tag.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }

    /// Project the tag into its brief representation.
    pub fn brief(&self) -> TagBrief {
        TagBrief {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Minimal tag projection embedded in note details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TagBrief {
    /// Tag ID.
    pub id: TagId,
    /// Tag name.
    pub name: String,
}
