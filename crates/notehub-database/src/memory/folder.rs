//! Folder reads and transactions for the in-memory backend.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{FolderId, UserId};
use notehub_entity::folder::{CreateFolder, Folder};

use super::{MemoryState, MemoryStore};
use crate::traits::{FolderStore, FolderTx};

#[async_trait]
impl FolderStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn FolderTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryFolderTx {
            inner: Some((guard, working)),
        }))
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.state.lock().await.folders.get(&id).cloned())
    }

    async fn find_root(&self, owner: UserId) -> AppResult<Option<Folder>> {
        Ok(self.state.lock().await.root_of(owner).cloned())
    }

    async fn find_children(&self, parent: FolderId) -> AppResult<Vec<Folder>> {
        Ok(self.state.lock().await.children_of(parent))
    }

    async fn find_subtree(&self, root: FolderId) -> AppResult<Vec<Folder>> {
        let state = self.state.lock().await;
        Ok(state
            .subtree_ids(root)
            .into_iter()
            .filter_map(|id| state.folders.get(&id).cloned())
            .collect())
    }

    async fn find_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let state = self.state.lock().await;
        Ok(state
            .ancestor_ids(id)
            .into_iter()
            .filter_map(|id| state.folders.get(&id).cloned())
            .collect())
    }
}

/// An in-memory unit of work.
///
/// Holds the store lock until committed or dropped, so other callers of the
/// same [`MemoryStore`] wait for it. Writes go to a private copy of the
/// state that replaces the shared one on commit.
#[derive(Debug)]
pub struct MemoryFolderTx {
    inner: Option<(OwnedMutexGuard<MemoryState>, MemoryState)>,
}

impl MemoryFolderTx {
    fn working(&mut self) -> AppResult<&mut MemoryState> {
        self.inner
            .as_mut()
            .map(|(_, working)| working)
            .ok_or_else(|| AppError::internal("Folder transaction already committed"))
    }
}

#[async_trait]
impl FolderTx for MemoryFolderTx {
    async fn find_by_id(&mut self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.working()?.folders.get(&id).cloned())
    }

    async fn lock_owner_tree(&mut self, _owner: UserId) -> AppResult<()> {
        // The store-wide lock is already held.
        self.working()?;
        Ok(())
    }

    async fn ensure_root(&mut self, owner: UserId) -> AppResult<Folder> {
        self.working()?.ensure_root(owner)
    }

    async fn sibling_exists(
        &mut self,
        owner: UserId,
        parent: FolderId,
        name: &str,
        excluding: Option<FolderId>,
    ) -> AppResult<bool> {
        Ok(self
            .working()?
            .sibling_exists(owner, parent, name, excluding))
    }

    async fn ancestor_ids(&mut self, id: FolderId) -> AppResult<Vec<FolderId>> {
        Ok(self.working()?.ancestor_ids(id))
    }

    async fn insert(&mut self, data: CreateFolder) -> AppResult<Folder> {
        self.working()?.insert_folder(data)
    }

    async fn update(&mut self, id: FolderId, name: &str, parent: FolderId) -> AppResult<Folder> {
        self.working()?.update_folder(id, name, parent)
    }

    async fn delete(&mut self, id: FolderId) -> AppResult<bool> {
        Ok(self.working()?.delete_folder(id))
    }

    async fn commit(&mut self) -> AppResult<()> {
        let (mut guard, working) = self
            .inner
            .take()
            .ok_or_else(|| AppError::internal("Folder transaction already committed"))?;
        *guard = working;
        Ok(())
    }
}
