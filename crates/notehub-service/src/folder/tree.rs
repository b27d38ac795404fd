//! Folder tree materialization.

use std::collections::HashMap;
use std::sync::Arc;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::traits::Service;
use notehub_core::types::FolderId;
use notehub_database::FolderStore;
use notehub_entity::folder::{Folder, FolderNode};

use crate::context::RequestContext;

/// Builds nested folder trees.
#[derive(Clone)]
pub struct TreeService {
    /// Folder store.
    folders: Arc<dyn FolderStore>,
}

impl Service for TreeService {}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(folders: Arc<dyn FolderStore>) -> Self {
        Self { folders }
    }

    /// Builds the user's complete folder tree, starting at the root.
    ///
    /// Children are sorted by name at every level. Fails with `NotFound` if
    /// the user has no root yet.
    pub async fn materialize_tree(&self, ctx: &RequestContext) -> AppResult<FolderNode> {
        let root = self
            .folders
            .find_root(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Root folder not found for user"))?;

        let descendants = self.folders.find_subtree(root.id).await?;
        Ok(build_tree(&root, &descendants))
    }

    /// Builds the tree below any folder.
    pub async fn subtree(&self, folder_id: FolderId) -> AppResult<FolderNode> {
        let top = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

        let descendants = self.folders.find_subtree(folder_id).await?;
        Ok(build_tree(&top, &descendants))
    }
}

/// Builds a tree from a flat list of descendants of `top`.
///
/// Folders whose parent is not reachable from `top` are ignored.
pub fn build_tree(top: &Folder, descendants: &[Folder]) -> FolderNode {
    let mut by_parent: HashMap<FolderId, Vec<&Folder>> = HashMap::new();
    for folder in descendants {
        if let Some(parent) = folder.parent_id {
            by_parent.entry(parent).or_default().push(folder);
        }
    }
    for children in by_parent.values_mut() {
        children.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    }
    attach(top, &by_parent)
}

fn attach(folder: &Folder, by_parent: &HashMap<FolderId, Vec<&Folder>>) -> FolderNode {
    let children = by_parent
        .get(&folder.id)
        .map(|kids| kids.iter().map(|kid| attach(kid, by_parent)).collect())
        .unwrap_or_default();

    FolderNode {
        id: folder.id,
        name: folder.name.clone(),
        children,
    }
}
