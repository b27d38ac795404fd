//! PostgreSQL implementations of the store traits.

pub mod folder;
pub mod note;
pub mod note_tag;
pub mod tag;
pub mod user;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::error;

use notehub_core::error::{AppError, ErrorKind};

use crate::constraint::Constraint;

pub use folder::{FolderRepository, FolderTransaction};
pub use note::NoteRepository;
pub use note_tag::NoteTagRepository;
pub use tag::TagRepository;
pub use user::UserRepository;

/// Every PostgreSQL-backed store over one shared pool.
#[derive(Debug, Clone)]
pub struct PgStores {
    /// User lookups.
    pub users: Arc<UserRepository>,
    /// Folder hierarchy.
    pub folders: Arc<FolderRepository>,
    /// Notes.
    pub notes: Arc<NoteRepository>,
    /// Note to tag links.
    pub note_tags: Arc<NoteTagRepository>,
    /// Tags.
    pub tags: Arc<TagRepository>,
}

impl PgStores {
    /// Build every repository over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            folders: Arc::new(FolderRepository::new(pool.clone())),
            notes: Arc::new(NoteRepository::new(pool.clone())),
            note_tags: Arc::new(NoteTagRepository::new(pool.clone())),
            tags: Arc::new(TagRepository::new(pool)),
        }
    }
}

/// Map a sqlx error into an [`AppError`].
///
/// Violations of named constraints become the matching client error kind;
/// everything else is logged and reported as a database fault.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if let Some(constraint) = db_err.constraint().and_then(Constraint::from_name) {
                return constraint.error();
            }
        }
        error!(error = %e, context, "Database operation failed");
        AppError::with_source(ErrorKind::Database, context, e)
    }
}
