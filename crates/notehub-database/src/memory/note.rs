//! Notes and note links for the in-memory backend.

use std::collections::HashSet;

use async_trait::async_trait;

use notehub_core::result::AppResult;
use notehub_core::types::{FolderId, NoteId, TagId, UserId};
use notehub_entity::note::{CreateNote, Note, NoteDetail, NoteSummary, sort_recent_first};

use super::MemoryStore;
use crate::constraint::Constraint;
use crate::traits::{NoteStore, NoteTagStore};

#[async_trait]
impl NoteStore for MemoryStore {
    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>> {
        Ok(self.state.lock().await.notes.get(&id).cloned())
    }

    async fn find_detail(&self, id: NoteId) -> AppResult<Option<NoteDetail>> {
        Ok(self.state.lock().await.detail_of(id))
    }

    async fn create(&self, data: CreateNote, tag_ids: &[TagId]) -> AppResult<Note> {
        self.state.lock().await.insert_note(data, tag_ids)
    }

    async fn update(&self, id: NoteId, data: CreateNote, tag_ids: &[TagId]) -> AppResult<Note> {
        self.state.lock().await.update_note(id, data, tag_ids)
    }

    async fn delete(&self, id: NoteId) -> AppResult<bool> {
        Ok(self.state.lock().await.delete_note(id))
    }

    async fn list_by_folder(&self, folder: FolderId) -> AppResult<Vec<NoteSummary>> {
        let mut notes: Vec<NoteSummary> = self
            .state
            .lock()
            .await
            .notes
            .values()
            .filter(|n| n.folder_id == folder)
            .map(Note::summary)
            .collect();
        sort_recent_first(&mut notes);
        Ok(notes)
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<NoteSummary>> {
        Ok(self.state.lock().await.owner_notes_where(owner, |_| true))
    }

    async fn list_details_by_owner(&self, owner: UserId) -> AppResult<Vec<NoteDetail>> {
        let state = self.state.lock().await;
        Ok(state
            .owner_notes_where(owner, |_| true)
            .into_iter()
            .filter_map(|summary| state.detail_of(summary.id))
            .collect())
    }

    async fn list_by_any_tag(&self, owner: UserId, tags: &[TagId]) -> AppResult<Vec<NoteSummary>> {
        let wanted: HashSet<TagId> = tags.iter().copied().collect();
        let state = self.state.lock().await;
        Ok(state.owner_notes_where(owner, |note| {
            state.tags_of(note.id).any(|tag| wanted.contains(&tag))
        }))
    }

    async fn list_by_all_tags(
        &self,
        owner: UserId,
        tags: &[TagId],
    ) -> AppResult<Vec<NoteSummary>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        let state = self.state.lock().await;
        Ok(state.owner_notes_where(owner, |note| {
            let linked: HashSet<TagId> = state.tags_of(note.id).collect();
            tags.iter().all(|tag| linked.contains(tag))
        }))
    }
}

#[async_trait]
impl NoteTagStore for MemoryStore {
    async fn attach(&self, note: NoteId, tag: TagId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.notes.contains_key(&note) {
            return Err(Constraint::LinkNoteExists.error());
        }
        state.check_tags_exist(&[tag])?;
        state.note_tags.insert((note, tag));
        Ok(())
    }

    async fn detach(&self, note: NoteId, tag: TagId) -> AppResult<bool> {
        Ok(self.state.lock().await.note_tags.remove(&(note, tag)))
    }

    async fn tag_ids_for_note(&self, note: NoteId) -> AppResult<Vec<TagId>> {
        Ok(self.state.lock().await.tags_of(note).collect())
    }
}
