//! Named storage constraints shared by every backend.
//!
//! The PostgreSQL schema declares these constraints by name; the in-memory
//! backend enforces the same rules and reports them with the same errors.

use notehub_core::error::AppError;

/// A storage-level rule whose violation is a client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// `(owner_id, parent_id, name)` is unique among folders.
    FolderSiblingName,
    /// At most one root folder per owner.
    OneRootPerOwner,
    /// `(owner_id, name)` is unique among tags.
    TagName,
    /// Usernames are unique.
    Username,
    /// Folders and tags reference an existing user.
    OwnerExists,
    /// A folder's parent exists.
    ParentExists,
    /// A note's folder exists.
    NoteFolderExists,
    /// A link's note exists.
    LinkNoteExists,
    /// A link's tag exists.
    LinkTagExists,
}

impl Constraint {
    /// Resolve a PostgreSQL constraint name.
    pub fn from_name(name: &str) -> Option<Self> {
        let constraint = match name {
            "folders_owner_parent_name_key" => Self::FolderSiblingName,
            "folders_one_root_per_owner" => Self::OneRootPerOwner,
            "tags_owner_name_key" => Self::TagName,
            "users_username_key" => Self::Username,
            "folders_owner_id_fkey" | "tags_owner_id_fkey" => Self::OwnerExists,
            "folders_parent_id_fkey" => Self::ParentExists,
            "notes_folder_id_fkey" => Self::NoteFolderExists,
            "note_tags_note_id_fkey" => Self::LinkNoteExists,
            "note_tags_tag_id_fkey" => Self::LinkTagExists,
            _ => return None,
        };
        Some(constraint)
    }

    /// The error reported when this constraint is violated.
    pub fn error(self) -> AppError {
        match self {
            Self::FolderSiblingName => {
                AppError::conflict("Folder with the same name already exists in the parent scope")
            }
            Self::OneRootPerOwner => AppError::conflict("User already has a root folder"),
            Self::TagName => {
                AppError::conflict("Tag with the same name already exists for this user")
            }
            Self::Username => AppError::conflict("Username is already taken"),
            Self::OwnerExists => AppError::not_found("User not found"),
            Self::ParentExists => AppError::not_found("Parent folder not found"),
            Self::NoteFolderExists => AppError::not_found("Folder not found"),
            Self::LinkNoteExists => AppError::not_found("Note not found"),
            Self::LinkTagExists => AppError::not_found("Tag not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_core::error::ErrorKind;

    #[test]
    fn test_known_constraints_map_to_client_errors() {
        let err = Constraint::from_name("folders_owner_parent_name_key")
            .expect("mapped")
            .error();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = Constraint::from_name("note_tags_tag_id_fkey")
            .expect("mapped")
            .error();
        assert_eq!(err.kind, ErrorKind::NotFound);

        assert!(Constraint::from_name("some_other_constraint").is_none());
    }
}
