//! Users and tags for the in-memory backend.

use async_trait::async_trait;

use notehub_core::result::AppResult;
use notehub_core::types::{TagId, UserId};
use notehub_entity::tag::Tag;
use notehub_entity::user::User;

use super::MemoryStore;
use crate::traits::{TagStore, UserDirectory};

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn exists(&self, id: UserId) -> AppResult<bool> {
        Ok(self.state.lock().await.users.contains_key(&id))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.state.lock().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn create(&self, username: &str) -> AppResult<User> {
        self.state.lock().await.insert_user(username)
    }

    async fn rename(&self, id: UserId, username: &str) -> AppResult<User> {
        self.state.lock().await.rename_user(id, username)
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        Ok(self.state.lock().await.delete_user(id))
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn find_by_id(&self, id: TagId) -> AppResult<Option<Tag>> {
        Ok(self.state.lock().await.tags.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[TagId]) -> AppResult<Vec<Tag>> {
        let state = self.state.lock().await;
        let mut tags: Vec<Tag> = ids
            .iter()
            .filter_map(|id| state.tags.get(id).cloned())
            .collect();
        tags.sort_by_key(|t| t.id);
        tags.dedup_by_key(|t| t.id);
        Ok(tags)
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .state
            .lock()
            .await
            .tags
            .values()
            .filter(|t| t.owner_id == owner)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn create(&self, owner: UserId, name: &str) -> AppResult<Tag> {
        self.state.lock().await.insert_tag(owner, name)
    }

    async fn rename(&self, id: TagId, name: &str) -> AppResult<Tag> {
        self.state.lock().await.rename_tag(id, name)
    }

    async fn delete(&self, id: TagId) -> AppResult<bool> {
        Ok(self.state.lock().await.delete_tag(id))
    }
}
