//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use notehub_core::config::LimitsConfig;
use notehub_core::types::{FolderId, NoteId, TagId};
use notehub_database::{MemoryStore, UserDirectory};
use notehub_entity::folder::Folder;
use notehub_service::folder::CreateFolderRequest;
use notehub_service::note::CreateNoteRequest;
use notehub_service::tag::CreateTagRequest;
use notehub_service::{RequestContext, Services};

/// Services over a fresh in-memory backend.
pub struct TestApp {
    /// Every service.
    pub services: Services,
    /// The backing store, for direct inspection.
    pub store: MemoryStore,
}

impl TestApp {
    /// Create a new test application.
    pub fn new() -> Self {
        Self::with_limits(LimitsConfig::default())
    }

    /// Create a test application with custom input limits.
    pub fn with_limits(limits: LimitsConfig) -> Self {
        let store = MemoryStore::new();
        Self {
            services: Services::new(store.clone(), limits),
            store,
        }
    }

    /// Register a user and return a request context acting as them.
    pub async fn user(&self, username: &str) -> RequestContext {
        let user = self
            .store
            .create(username)
            .await
            .expect("Failed to create test user");
        RequestContext::new(user.id)
    }

    /// Ensure the user's root exists and return it.
    pub async fn root(&self, ctx: &RequestContext) -> Folder {
        self.services
            .folders
            .get_or_create_root(ctx)
            .await
            .expect("Failed to create root")
    }

    /// Create a folder, panicking on failure.
    pub async fn folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Folder {
        self.services
            .folders
            .create(
                ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    parent_id,
                },
            )
            .await
            .unwrap_or_else(|e| panic!("Failed to create folder {name}: {e}"))
    }

    /// Create a tag, panicking on failure.
    pub async fn tag(&self, ctx: &RequestContext, name: &str) -> TagId {
        self.services
            .tags
            .create(
                ctx,
                CreateTagRequest {
                    name: name.to_string(),
                },
            )
            .await
            .unwrap_or_else(|e| panic!("Failed to create tag {name}: {e}"))
            .id
    }

    /// Create a note, panicking on failure.
    pub async fn note(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        title: &str,
        tag_ids: &[TagId],
    ) -> NoteId {
        self.services
            .notes
            .create(ctx, note_request(folder_id, title, tag_ids))
            .await
            .unwrap_or_else(|e| panic!("Failed to create note {title}: {e}"))
            .id
    }
}

/// Build a note request with empty content.
pub fn note_request(folder_id: FolderId, title: &str, tag_ids: &[TagId]) -> CreateNoteRequest {
    CreateNoteRequest {
        folder_id,
        title: title.to_string(),
        content: String::new(),
        tag_ids: tag_ids.to_vec(),
    }
}
