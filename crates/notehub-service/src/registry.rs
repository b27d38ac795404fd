//! Wiring of every service over one storage backend.

use std::sync::Arc;

use notehub_core::config::LimitsConfig;
use notehub_database::{
    FolderStore, MemoryStore, NoteStore, NoteTagStore, PgStores, TagStore, UserDirectory,
};

use crate::folder::{FolderService, TreeService};
use crate::note::{NoteService, TagFilterService};
use crate::tag::TagService;
use crate::user::UserService;

/// Every store a service may depend on, as trait objects.
#[derive(Clone)]
pub struct Stores {
    /// User lookups.
    pub users: Arc<dyn UserDirectory>,
    /// Folder hierarchy.
    pub folders: Arc<dyn FolderStore>,
    /// Notes.
    pub notes: Arc<dyn NoteStore>,
    /// Note to tag links.
    pub note_tags: Arc<dyn NoteTagStore>,
    /// Tags.
    pub tags: Arc<dyn TagStore>,
}

impl From<PgStores> for Stores {
    fn from(stores: PgStores) -> Self {
        Self {
            users: stores.users,
            folders: stores.folders,
            notes: stores.notes,
            note_tags: stores.note_tags,
            tags: stores.tags,
        }
    }
}

impl From<MemoryStore> for Stores {
    fn from(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            folders: Arc::new(store.clone()),
            notes: Arc::new(store.clone()),
            note_tags: Arc::new(store.clone()),
            tags: Arc::new(store),
        }
    }
}

/// All services, sharing one set of stores.
#[derive(Clone)]
pub struct Services {
    /// User management.
    pub users: UserService,
    /// Folder hierarchy manager.
    pub folders: FolderService,
    /// Tree materialization.
    pub trees: TreeService,
    /// Tag filter engine.
    pub filter: TagFilterService,
    /// Note CRUD and tagging.
    pub notes: NoteService,
    /// Tag CRUD.
    pub tags: TagService,
}

impl Services {
    /// Build every service over `stores`.
    pub fn new(stores: impl Into<Stores>, limits: LimitsConfig) -> Self {
        let stores = stores.into();
        Self {
            users: UserService::new(stores.users.clone(), limits.clone()),
            folders: FolderService::new(
                stores.users.clone(),
                stores.folders.clone(),
                stores.notes.clone(),
                limits.clone(),
            ),
            trees: TreeService::new(stores.folders.clone()),
            filter: TagFilterService::new(
                stores.users.clone(),
                stores.tags.clone(),
                stores.notes.clone(),
            ),
            notes: NoteService::new(
                stores.users.clone(),
                stores.folders.clone(),
                stores.notes.clone(),
                stores.note_tags,
                stores.tags.clone(),
                limits.clone(),
            ),
            tags: TagService::new(stores.users, stores.tags, limits),
        }
    }
}
