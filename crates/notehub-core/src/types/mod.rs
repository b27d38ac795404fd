//! Shared value types.

pub mod id;

pub use id::{FolderId, NoteId, TagId, UserId};
