//! Combined listing of a folder's direct children and notes.

use serde::{Deserialize, Serialize};

use super::model::Folder;
use crate::note::NoteSummary;

/// Direct child folders (name ascending) and notes (most recently
/// updated first) of a single folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContents {
    /// Child folders.
    pub folders: Vec<Folder>,
    /// Notes stored directly in the folder.
    pub notes: Vec<NoteSummary>,
}
