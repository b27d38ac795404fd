//! Note CRUD and tagging, scoped to the folder owner.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use notehub_core::config::LimitsConfig;
use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::traits::Service;
use notehub_core::types::{FolderId, NoteId, TagId, UserId};
use notehub_database::{FolderStore, NoteStore, NoteTagStore, TagStore, UserDirectory};
use notehub_entity::folder::Folder;
use notehub_entity::note::{CreateNote, Note, NoteDetail, NoteSummary};

use crate::context::RequestContext;
use crate::validation;

/// Manages notes and their tag sets.
#[derive(Clone)]
pub struct NoteService {
    /// User lookups.
    users: Arc<dyn UserDirectory>,
    /// Folder store, for ownership.
    folders: Arc<dyn FolderStore>,
    /// Note store.
    notes: Arc<dyn NoteStore>,
    /// Note to tag links.
    note_tags: Arc<dyn NoteTagStore>,
    /// Tag store.
    tags: Arc<dyn TagStore>,
    /// Input limits.
    limits: LimitsConfig,
}

impl Service for NoteService {}

/// Request to create a note, or to overwrite one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Folder holding the note.
    pub folder_id: FolderId,
    /// Note title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Note body.
    #[serde(default)]
    pub content: String,
    /// Tags to attach. Replaces the whole tag set on update.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

/// Request to overwrite a note. Same shape as a create.
pub type UpdateNoteRequest = CreateNoteRequest;

impl NoteService {
    /// Creates a new note service.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        folders: Arc<dyn FolderStore>,
        notes: Arc<dyn NoteStore>,
        note_tags: Arc<dyn NoteTagStore>,
        tags: Arc<dyn TagStore>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            users,
            folders,
            notes,
            note_tags,
            tags,
            limits,
        }
    }

    /// Creates a note in one of the user's folders.
    pub async fn create(&self, ctx: &RequestContext, req: CreateNoteRequest) -> AppResult<Note> {
        self.check_request(&req)?;
        self.owned_folder(ctx.user_id, req.folder_id).await?;
        let tag_ids = self.owned_tags(ctx.user_id, &req.tag_ids).await?;

        let note = self
            .notes
            .create(
                CreateNote {
                    folder_id: req.folder_id,
                    title: req.title,
                    content: req.content,
                },
                &tag_ids,
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            note_id = %note.id,
            folder_id = %note.folder_id,
            tags = tag_ids.len(),
            "Note created"
        );

        Ok(note)
    }

    /// Gets a note with its tags.
    pub async fn get(&self, ctx: &RequestContext, note_id: NoteId) -> AppResult<NoteDetail> {
        self.owned_note(ctx.user_id, note_id).await?;
        self.notes
            .find_detail(note_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Note {note_id} not found")))
    }

    /// Lists the notes stored directly in one of the user's folders.
    pub async fn list_by_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<NoteSummary>> {
        self.owned_folder(ctx.user_id, folder_id).await?;
        self.notes.list_by_folder(folder_id).await
    }

    /// Lists every note of the user, most recently updated first.
    pub async fn list_by_user(&self, ctx: &RequestContext) -> AppResult<Vec<NoteSummary>> {
        if !self.users.exists(ctx.user_id).await? {
            return Err(AppError::not_found(format!("User {} not found", ctx.user_id)));
        }
        self.notes.list_by_owner(ctx.user_id).await
    }

    /// Lists every note of the user with content and tags, most recently
    /// updated first.
    pub async fn list_full_by_user(&self, ctx: &RequestContext) -> AppResult<Vec<NoteDetail>> {
        if !self.users.exists(ctx.user_id).await? {
            return Err(AppError::not_found(format!("User {} not found", ctx.user_id)));
        }
        self.notes.list_details_by_owner(ctx.user_id).await
    }

    /// Overwrites a note's title, body, folder and tag set.
    ///
    /// The note may move to another folder of the same user.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        note_id: NoteId,
        req: UpdateNoteRequest,
    ) -> AppResult<Note> {
        self.check_request(&req)?;
        let current = self.owned_note(ctx.user_id, note_id).await?;

        let target = self
            .folders
            .find_by_id(req.folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {} not found", req.folder_id)))?;
        if !target.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden(
                "Cannot move note to a folder of another user",
            ));
        }
        let tag_ids = self.owned_tags(ctx.user_id, &req.tag_ids).await?;

        let note = self
            .notes
            .update(
                note_id,
                CreateNote {
                    folder_id: req.folder_id,
                    title: req.title,
                    content: req.content,
                },
                &tag_ids,
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            note_id = %note_id,
            old_folder = %current.folder_id,
            new_folder = %note.folder_id,
            tags = tag_ids.len(),
            "Note updated"
        );

        Ok(note)
    }

    /// Deletes a note and its tag links.
    pub async fn delete(&self, ctx: &RequestContext, note_id: NoteId) -> AppResult<()> {
        self.owned_note(ctx.user_id, note_id).await?;
        if !self.notes.delete(note_id).await? {
            return Err(AppError::not_found(format!("Note {note_id} not found")));
        }

        info!(user_id = %ctx.user_id, note_id = %note_id, "Note deleted");
        Ok(())
    }

    /// Attaches one of the user's tags to one of the user's notes.
    pub async fn add_tag(
        &self,
        ctx: &RequestContext,
        note_id: NoteId,
        tag_id: TagId,
    ) -> AppResult<()> {
        self.owned_note(ctx.user_id, note_id).await?;
        self.owned_tags(ctx.user_id, &[tag_id]).await?;
        self.note_tags.attach(note_id, tag_id).await?;

        info!(user_id = %ctx.user_id, note_id = %note_id, tag_id = %tag_id, "Tag attached");
        Ok(())
    }

    /// Detaches a tag from one of the user's notes.
    pub async fn remove_tag(
        &self,
        ctx: &RequestContext,
        note_id: NoteId,
        tag_id: TagId,
    ) -> AppResult<()> {
        self.owned_note(ctx.user_id, note_id).await?;
        if !self.note_tags.detach(note_id, tag_id).await? {
            return Err(AppError::not_found(format!(
                "Tag {tag_id} is not attached to note {note_id}"
            )));
        }

        info!(user_id = %ctx.user_id, note_id = %note_id, tag_id = %tag_id, "Tag detached");
        Ok(())
    }

    fn check_request(&self, req: &CreateNoteRequest) -> AppResult<()> {
        validation::check(req)?;
        validation::require_name("Note title", &req.title, self.limits.max_title_length)
    }

    async fn owned_folder(&self, user_id: UserId, folder_id: FolderId) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        if !folder.is_owned_by(user_id) {
            return Err(AppError::forbidden("Folder belongs to another user"));
        }
        Ok(folder)
    }

    async fn owned_note(&self, user_id: UserId, note_id: NoteId) -> AppResult<Note> {
        let note = self
            .notes
            .find_by_id(note_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Note {note_id} not found")))?;
        let folder = self
            .folders
            .find_by_id(note.folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Note {note_id} not found")))?;
        if !folder.is_owned_by(user_id) {
            return Err(AppError::forbidden("Note belongs to another user"));
        }
        Ok(note)
    }

    /// Collapse duplicates and check every tag exists and belongs to the user.
    async fn owned_tags(&self, user_id: UserId, tag_ids: &[TagId]) -> AppResult<Vec<TagId>> {
        let wanted: BTreeSet<TagId> = tag_ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let found = self
            .tags
            .find_many(&wanted.iter().copied().collect::<Vec<_>>())
            .await?;
        if let Some(missing) = wanted.iter().find(|id| !found.iter().any(|t| t.id == **id)) {
            return Err(AppError::not_found(format!("Tag {missing} not found")));
        }
        if let Some(foreign) = found.iter().find(|t| !t.is_owned_by(user_id)) {
            return Err(AppError::forbidden(format!(
                "Tag {} belongs to another user",
                foreign.id
            )));
        }

        Ok(wanted.into_iter().collect())
    }
}
