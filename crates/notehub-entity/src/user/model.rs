//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notehub_core::types::UserId;

/// A user known to NoteHub.
///
/// Credentials live with the external identity component; this row only
/// anchors ownership of folders and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
