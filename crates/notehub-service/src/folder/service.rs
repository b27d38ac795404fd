//! Folder hierarchy operations with ownership and tree-shape enforcement.
//!
//! Every mutation runs inside one [`FolderTx`] that first locks the acting
//! user's tree, so the ancestor walk of a move and the move itself cannot
//! interleave with another move of the same user.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use notehub_core::config::LimitsConfig;
use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::traits::Service;
use notehub_core::types::{FolderId, UserId};
use notehub_database::{FolderStore, FolderTx, NoteStore, UserDirectory};
use notehub_entity::folder::{CreateFolder, Folder, FolderContents};

use crate::context::RequestContext;
use crate::validation;

/// Manages the per-user folder hierarchy.
#[derive(Clone)]
pub struct FolderService {
    /// User lookups.
    users: Arc<dyn UserDirectory>,
    /// Folder store.
    folders: Arc<dyn FolderStore>,
    /// Note store, for folder contents.
    notes: Arc<dyn NoteStore>,
    /// Input limits.
    limits: LimitsConfig,
}

impl Service for FolderService {}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, message = "Folder name is required"))]
    pub name: String,
    /// Parent folder ID. `None` attaches the folder under the user's root.
    pub parent_id: Option<FolderId>,
}

/// Request to rename and/or move a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// New folder name. Pass the current name to move without renaming.
    #[validate(length(min = 1, message = "Folder name is required"))]
    pub name: String,
    /// New parent folder ID. `None` moves the folder under the user's root.
    pub parent_id: Option<FolderId>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        folders: Arc<dyn FolderStore>,
        notes: Arc<dyn NoteStore>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            users,
            folders,
            notes,
            limits,
        }
    }

    /// Returns the user's root folder, creating it on first use.
    ///
    /// Concurrent first calls for the same user converge on one root.
    pub async fn get_or_create_root(&self, ctx: &RequestContext) -> AppResult<Folder> {
        if let Some(root) = self.folders.find_root(ctx.user_id).await? {
            return Ok(root);
        }

        self.require_user(ctx.user_id).await?;

        let mut tx = self.folders.begin().await?;
        let root = tx.ensure_root(ctx.user_id).await?;
        tx.commit().await?;

        info!(user_id = %ctx.user_id, folder_id = %root.id, "Root folder ready");
        Ok(root)
    }

    /// Creates a folder under `parent_id`, or under the user's root.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        validation::check(&req)?;
        validation::require_name("Folder name", &req.name, self.limits.max_name_length)?;
        self.require_user(ctx.user_id).await?;

        let mut tx = self.folders.begin().await?;
        tx.lock_owner_tree(ctx.user_id).await?;

        let parent = resolve_parent(&mut *tx, ctx.user_id, req.parent_id).await?;

        if tx
            .sibling_exists(ctx.user_id, parent.id, &req.name, None)
            .await?
        {
            return Err(AppError::conflict(format!(
                "Folder '{}' already exists in this location",
                req.name
            )));
        }

        let folder = tx
            .insert(CreateFolder {
                owner_id: ctx.user_id,
                parent_id: parent.id,
                name: req.name,
            })
            .await?;
        tx.commit().await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = %parent.id,
            name = %folder.name,
            "Folder created"
        );

        Ok(folder)
    }

    /// Gets a folder by ID.
    pub async fn get(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Lists the direct children of a folder, ordered by name.
    pub async fn list_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        self.get(parent_id).await?;
        self.folders.find_children(parent_id).await
    }

    /// Lists the user's top-level folders.
    ///
    /// Fails with `NotFound` if the user has no root yet; this does not
    /// create one.
    pub async fn list_root_children(&self, ctx: &RequestContext) -> AppResult<Vec<Folder>> {
        let root = self
            .folders
            .find_root(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Root folder not found for user"))?;
        self.folders.find_children(root.id).await
    }

    /// Lists a folder's child folders together with the notes it holds.
    pub async fn list_contents(&self, folder_id: FolderId) -> AppResult<FolderContents> {
        self.get(folder_id).await?;
        let folders = self.folders.find_children(folder_id).await?;
        let notes = self.notes.list_by_folder(folder_id).await?;
        Ok(FolderContents { folders, notes })
    }

    /// Gets the trail of folders from the root down to `folder_id`.
    pub async fn breadcrumbs(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        let mut trail = self.folders.find_ancestors(folder_id).await?;
        if trail.is_empty() {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        trail.reverse();
        Ok(trail)
    }

    /// Renames and/or moves a folder.
    ///
    /// Checks run in order: the folder exists, belongs to the user and is
    /// not the root; the target parent exists and belongs to the user; the
    /// target is not the folder itself or one of its descendants; no other
    /// sibling under the target has the new name.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<Folder> {
        validation::check(&req)?;
        validation::require_name("Folder name", &req.name, self.limits.max_name_length)?;
        self.require_user(ctx.user_id).await?;

        let mut tx = self.folders.begin().await?;
        tx.lock_owner_tree(ctx.user_id).await?;

        let folder = tx
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        if !folder.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden("Folder belongs to another user"));
        }
        if folder.is_root {
            warn!(user_id = %ctx.user_id, folder_id = %folder_id, "Rejected root folder update");
            return Err(AppError::forbidden("Root folder cannot be renamed or moved"));
        }

        let parent = resolve_parent(&mut *tx, ctx.user_id, req.parent_id).await?;

        if tx.ancestor_ids(parent.id).await?.contains(&folder_id) {
            warn!(
                user_id = %ctx.user_id,
                folder_id = %folder_id,
                target_parent = %parent.id,
                "Rejected cyclic folder move"
            );
            return Err(AppError::forbidden(
                "Cannot move folder into itself or its own descendant",
            ));
        }

        if tx
            .sibling_exists(ctx.user_id, parent.id, &req.name, Some(folder_id))
            .await?
        {
            return Err(AppError::conflict(format!(
                "Folder '{}' already exists in this location",
                req.name
            )));
        }

        let updated = tx.update(folder_id, &req.name, parent.id).await?;
        tx.commit().await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            old_parent = ?folder.parent_id,
            new_parent = %parent.id,
            name = %updated.name,
            "Folder updated"
        );

        Ok(updated)
    }

    /// Deletes a folder with all its descendants and their notes.
    pub async fn delete(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        self.require_user(ctx.user_id).await?;

        let mut tx = self.folders.begin().await?;
        tx.lock_owner_tree(ctx.user_id).await?;

        let folder = tx
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        if !folder.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden("Folder belongs to another user"));
        }
        if folder.is_root {
            warn!(user_id = %ctx.user_id, folder_id = %folder_id, "Rejected root folder delete");
            return Err(AppError::forbidden("Root folder cannot be deleted"));
        }

        if !tx.delete(folder_id).await? {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        tx.commit().await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            name = %folder.name,
            "Folder deleted"
        );

        Ok(())
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<()> {
        if self.users.exists(user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("User {user_id} not found")))
        }
    }
}

/// Resolve the folder a create or move targets.
///
/// An explicit parent must exist and belong to `owner`; without one the
/// owner's root is used, created if missing.
async fn resolve_parent(
    tx: &mut dyn FolderTx,
    owner: UserId,
    parent_id: Option<FolderId>,
) -> AppResult<Folder> {
    match parent_id {
        Some(id) => {
            let parent = tx
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Parent folder {id} not found")))?;
            if !parent.is_owned_by(owner) {
                return Err(AppError::forbidden("Parent folder belongs to another user"));
            }
            Ok(parent)
        }
        None => tx.ensure_root(owner).await,
    }
}
