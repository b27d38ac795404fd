//! Tag CRUD with per-user name uniqueness.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use notehub_core::config::LimitsConfig;
use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::traits::Service;
use notehub_core::types::TagId;
use notehub_database::{TagStore, UserDirectory};
use notehub_entity::tag::Tag;

use crate::context::RequestContext;
use crate::validation;

/// Manages a user's tags.
#[derive(Clone)]
pub struct TagService {
    /// User lookups.
    users: Arc<dyn UserDirectory>,
    /// Tag store.
    tags: Arc<dyn TagStore>,
    /// Input limits.
    limits: LimitsConfig,
}

impl Service for TagService {}

/// Request to create a tag.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Tag name, unique per user.
    #[validate(length(min = 1, message = "Tag name is required"))]
    pub name: String,
}

/// Request to rename a tag.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameTagRequest {
    /// New tag name.
    #[validate(length(min = 1, message = "Tag name is required"))]
    pub name: String,
}

impl TagService {
    /// Creates a new tag service.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        tags: Arc<dyn TagStore>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            users,
            tags,
            limits,
        }
    }

    /// Creates a tag for the user.
    pub async fn create(&self, ctx: &RequestContext, req: CreateTagRequest) -> AppResult<Tag> {
        validation::check(&req)?;
        validation::require_name("Tag name", &req.name, self.limits.max_name_length)?;
        if !self.users.exists(ctx.user_id).await? {
            return Err(AppError::not_found(format!("User {} not found", ctx.user_id)));
        }

        let tag = self.tags.create(ctx.user_id, &req.name).await?;

        info!(user_id = %ctx.user_id, tag_id = %tag.id, name = %tag.name, "Tag created");
        Ok(tag)
    }

    /// Gets one of the user's tags.
    pub async fn get(&self, ctx: &RequestContext, tag_id: TagId) -> AppResult<Tag> {
        let tag = self
            .tags
            .find_by_id(tag_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag {tag_id} not found")))?;
        if !tag.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden("Tag belongs to another user"));
        }
        Ok(tag)
    }

    /// Lists the user's tags ordered by name.
    pub async fn list_by_user(&self, ctx: &RequestContext) -> AppResult<Vec<Tag>> {
        if !self.users.exists(ctx.user_id).await? {
            return Err(AppError::not_found(format!("User {} not found", ctx.user_id)));
        }
        self.tags.list_by_owner(ctx.user_id).await
    }

    /// Renames one of the user's tags.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        tag_id: TagId,
        req: RenameTagRequest,
    ) -> AppResult<Tag> {
        validation::check(&req)?;
        validation::require_name("Tag name", &req.name, self.limits.max_name_length)?;
        let old = self.get(ctx, tag_id).await?;

        let tag = self.tags.rename(tag_id, &req.name).await?;

        info!(
            user_id = %ctx.user_id,
            tag_id = %tag_id,
            old_name = %old.name,
            new_name = %tag.name,
            "Tag renamed"
        );
        Ok(tag)
    }

    /// Deletes one of the user's tags and detaches it from every note.
    pub async fn delete(&self, ctx: &RequestContext, tag_id: TagId) -> AppResult<()> {
        let tag = self.get(ctx, tag_id).await?;
        if !self.tags.delete(tag_id).await? {
            return Err(AppError::not_found(format!("Tag {tag_id} not found")));
        }

        info!(user_id = %ctx.user_id, tag_id = %tag_id, name = %tag.name, "Tag deleted");
        Ok(())
    }
}
