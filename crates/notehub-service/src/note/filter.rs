//! Multi-tag note filtering with AND/OR semantics.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::traits::Service;
use notehub_core::types::{TagId, UserId};
use notehub_database::{NoteStore, TagStore, UserDirectory};
use notehub_entity::note::{FilterMode, NoteSummary};

use crate::context::RequestContext;

/// Answers "which of my notes carry these tags" queries.
///
/// Results are note summaries ordered by `updated_at` descending, ties
/// broken by ascending note ID.
#[derive(Clone)]
pub struct TagFilterService {
    /// User lookups.
    users: Arc<dyn UserDirectory>,
    /// Tag store, for ownership checks.
    tags: Arc<dyn TagStore>,
    /// Note store.
    notes: Arc<dyn NoteStore>,
}

impl Service for TagFilterService {}

impl TagFilterService {
    /// Creates a new tag filter service.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        tags: Arc<dyn TagStore>,
        notes: Arc<dyn NoteStore>,
    ) -> Self {
        Self { users, tags, notes }
    }

    /// Filters the user's notes by a set of tags.
    ///
    /// With [`FilterMode::And`] a note qualifies when it carries every tag in
    /// `tag_ids` (extra tags are fine); with [`FilterMode::Or`] when it
    /// carries at least one. Duplicate IDs in `tag_ids` count once. An empty
    /// `tag_ids` returns all of the user's notes in either mode.
    pub async fn filter_by_tags(
        &self,
        ctx: &RequestContext,
        tag_ids: &[TagId],
        mode: FilterMode,
    ) -> AppResult<Vec<NoteSummary>> {
        self.require_user(ctx.user_id).await?;

        let distinct: Vec<TagId> = tag_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        debug!(
            user_id = %ctx.user_id,
            tags = distinct.len(),
            mode = %mode,
            "Filtering notes by tags"
        );

        if distinct.is_empty() {
            return self.notes.list_by_owner(ctx.user_id).await;
        }

        match mode {
            FilterMode::Or => self.notes.list_by_any_tag(ctx.user_id, &distinct).await,
            FilterMode::And => self.notes.list_by_all_tags(ctx.user_id, &distinct).await,
        }
    }

    /// Lists the user's notes carrying one tag.
    ///
    /// The tag must exist (`NotFound`) and belong to the user (`Forbidden`).
    pub async fn list_by_tag_and_user(
        &self,
        ctx: &RequestContext,
        tag_id: TagId,
    ) -> AppResult<Vec<NoteSummary>> {
        self.require_user(ctx.user_id).await?;

        let tag = self
            .tags
            .find_by_id(tag_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag {tag_id} not found")))?;
        if !tag.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden("Tag belongs to another user"));
        }

        self.notes.list_by_all_tags(ctx.user_id, &[tag_id]).await
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<()> {
        if self.users.exists(user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("User {user_id} not found")))
        }
    }
}
