//! The data held by [`super::MemoryStore`] and its integrity rules.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::Utc;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{FolderId, NoteId, TagId, UserId};
use notehub_entity::folder::{CreateFolder, Folder};
use notehub_entity::note::{CreateNote, Note, NoteDetail, NoteSummary, sort_recent_first};
use notehub_entity::tag::{Tag, TagBrief};
use notehub_entity::user::User;

use crate::constraint::Constraint;

/// Every table of the in-memory backend.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryState {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) folders: BTreeMap<FolderId, Folder>,
    pub(crate) notes: BTreeMap<NoteId, Note>,
    pub(crate) tags: BTreeMap<TagId, Tag>,
    pub(crate) note_tags: BTreeSet<(NoteId, TagId)>,
}

impl MemoryState {
    // --- users -----------------------------------------------------------

    pub(crate) fn insert_user(&mut self, username: &str) -> AppResult<User> {
        if self.users.values().any(|u| u.username == username) {
            return Err(Constraint::Username.error());
        }
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub(crate) fn rename_user(&mut self, id: UserId, username: &str) -> AppResult<User> {
        if !self.users.contains_key(&id) {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        if self
            .users
            .values()
            .any(|u| u.username == username && u.id != id)
        {
            return Err(Constraint::Username.error());
        }
        let user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.username = username.to_string();
        Ok(user.clone())
    }

    /// Remove a user with their folders, notes, tags and every link that
    /// touches them.
    pub(crate) fn delete_user(&mut self, id: UserId) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }

        let folders: HashSet<FolderId> = self
            .folders
            .values()
            .filter(|f| f.owner_id == id)
            .map(|f| f.id)
            .collect();
        let notes: HashSet<NoteId> = self
            .notes
            .values()
            .filter(|n| folders.contains(&n.folder_id))
            .map(|n| n.id)
            .collect();
        let tags: HashSet<TagId> = self
            .tags
            .values()
            .filter(|t| t.owner_id == id)
            .map(|t| t.id)
            .collect();

        self.note_tags
            .retain(|(note, tag)| !notes.contains(note) && !tags.contains(tag));
        self.tags.retain(|tag, _| !tags.contains(tag));
        self.notes.retain(|note, _| !notes.contains(note));
        self.folders.retain(|folder, _| !folders.contains(folder));
        true
    }

    // --- folders ---------------------------------------------------------

    pub(crate) fn root_of(&self, owner: UserId) -> Option<&Folder> {
        self.folders
            .values()
            .find(|f| f.owner_id == owner && f.is_root)
    }

    pub(crate) fn ensure_root(&mut self, owner: UserId) -> AppResult<Folder> {
        if let Some(root) = self.root_of(owner) {
            return Ok(root.clone());
        }
        if !self.users.contains_key(&owner) {
            return Err(Constraint::OwnerExists.error());
        }
        let root = Folder::new_root(owner);
        self.folders.insert(root.id, root.clone());
        Ok(root)
    }

    pub(crate) fn sibling_exists(
        &self,
        owner: UserId,
        parent: FolderId,
        name: &str,
        excluding: Option<FolderId>,
    ) -> bool {
        self.folders.values().any(|f| {
            f.owner_id == owner
                && f.parent_id == Some(parent)
                && f.name == name
                && Some(f.id) != excluding
        })
    }

    /// Children of `parent` ordered by name, byte-wise.
    pub(crate) fn children_of(&self, parent: FolderId) -> Vec<Folder> {
        let mut children: Vec<Folder> = self
            .folders
            .values()
            .filter(|f| f.parent_id == Some(parent))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// IDs of every descendant of `root`, excluding `root`.
    pub(crate) fn subtree_ids(&self, root: FolderId) -> Vec<FolderId> {
        let mut found = Vec::new();
        let mut frontier = vec![root];
        while let Some(current) = frontier.pop() {
            for folder in self.folders.values() {
                if folder.parent_id == Some(current) {
                    found.push(folder.id);
                    frontier.push(folder.id);
                }
            }
        }
        found
    }

    /// `id` followed by its ancestors up to the root. Stops if a folder
    /// repeats so corrupt data cannot loop forever.
    pub(crate) fn ancestor_ids(&self, id: FolderId) -> Vec<FolderId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.folders.get(&id);
        while let Some(folder) = current {
            if !seen.insert(folder.id) {
                break;
            }
            chain.push(folder.id);
            current = folder.parent_id.and_then(|p| self.folders.get(&p));
        }
        chain
    }

    pub(crate) fn insert_folder(&mut self, data: CreateFolder) -> AppResult<Folder> {
        if !self.users.contains_key(&data.owner_id) {
            return Err(Constraint::OwnerExists.error());
        }
        if !self.folders.contains_key(&data.parent_id) {
            return Err(Constraint::ParentExists.error());
        }
        if self.sibling_exists(data.owner_id, data.parent_id, &data.name, None) {
            return Err(Constraint::FolderSiblingName.error());
        }
        let folder = data.into_folder();
        self.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    pub(crate) fn update_folder(
        &mut self,
        id: FolderId,
        name: &str,
        parent: FolderId,
    ) -> AppResult<Folder> {
        let owner = match self.folders.get(&id) {
            Some(folder) if !folder.is_root => folder.owner_id,
            _ => return Err(AppError::not_found(format!("Folder {id} not found"))),
        };
        if !self.folders.contains_key(&parent) {
            return Err(Constraint::ParentExists.error());
        }
        if self.sibling_exists(owner, parent, name, Some(id)) {
            return Err(Constraint::FolderSiblingName.error());
        }
        let folder = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.name = name.to_string();
        folder.parent_id = Some(parent);
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    /// Remove a non-root folder, its descendants, their notes and links.
    pub(crate) fn delete_folder(&mut self, id: FolderId) -> bool {
        match self.folders.get(&id) {
            Some(folder) if !folder.is_root => {}
            _ => return false,
        }

        let mut doomed: HashSet<FolderId> = self.subtree_ids(id).into_iter().collect();
        doomed.insert(id);

        let doomed_notes: HashSet<NoteId> = self
            .notes
            .values()
            .filter(|n| doomed.contains(&n.folder_id))
            .map(|n| n.id)
            .collect();

        self.note_tags
            .retain(|(note, _)| !doomed_notes.contains(note));
        self.notes.retain(|id, _| !doomed_notes.contains(id));
        self.folders.retain(|id, _| !doomed.contains(id));
        true
    }

    // --- notes -----------------------------------------------------------

    pub(crate) fn folder_owner(&self, folder: FolderId) -> Option<UserId> {
        self.folders.get(&folder).map(|f| f.owner_id)
    }

    pub(crate) fn check_tags_exist(&self, tag_ids: &[TagId]) -> AppResult<()> {
        if tag_ids.iter().all(|t| self.tags.contains_key(t)) {
            Ok(())
        } else {
            Err(Constraint::LinkTagExists.error())
        }
    }

    pub(crate) fn insert_note(&mut self, data: CreateNote, tag_ids: &[TagId]) -> AppResult<Note> {
        if !self.folders.contains_key(&data.folder_id) {
            return Err(Constraint::NoteFolderExists.error());
        }
        self.check_tags_exist(tag_ids)?;

        let now = Utc::now();
        let note = Note {
            id: NoteId::new(),
            folder_id: data.folder_id,
            title: data.title,
            content: data.content,
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(note.id, note.clone());
        self.note_tags
            .extend(tag_ids.iter().map(|tag| (note.id, *tag)));
        Ok(note)
    }

    pub(crate) fn update_note(
        &mut self,
        id: NoteId,
        data: CreateNote,
        tag_ids: &[TagId],
    ) -> AppResult<Note> {
        if !self.notes.contains_key(&id) {
            return Err(AppError::not_found(format!("Note {id} not found")));
        }
        if !self.folders.contains_key(&data.folder_id) {
            return Err(Constraint::NoteFolderExists.error());
        }
        self.check_tags_exist(tag_ids)?;

        let note = self
            .notes
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Note {id} not found")))?;
        note.folder_id = data.folder_id;
        note.title = data.title;
        note.content = data.content;
        note.updated_at = Utc::now();
        let note = note.clone();

        self.note_tags.retain(|(note_id, _)| *note_id != id);
        self.note_tags.extend(tag_ids.iter().map(|tag| (id, *tag)));
        Ok(note)
    }

    pub(crate) fn delete_note(&mut self, id: NoteId) -> bool {
        if self.notes.remove(&id).is_none() {
            return false;
        }
        self.note_tags.retain(|(note, _)| *note != id);
        true
    }

    /// Summaries of the owner's notes that satisfy `keep`, newest first.
    pub(crate) fn owner_notes_where(
        &self,
        owner: UserId,
        keep: impl Fn(&Note) -> bool,
    ) -> Vec<NoteSummary> {
        let mut notes: Vec<NoteSummary> = self
            .notes
            .values()
            .filter(|n| self.folder_owner(n.folder_id) == Some(owner))
            .filter(|n| keep(n))
            .map(Note::summary)
            .collect();
        sort_recent_first(&mut notes);
        notes
    }

    /// A note with its tags sorted by name.
    pub(crate) fn detail_of(&self, id: NoteId) -> Option<NoteDetail> {
        let note = self.notes.get(&id)?.clone();
        let mut tags: Vec<TagBrief> = self
            .tags_of(id)
            .filter_map(|tag| self.tags.get(&tag).map(Tag::brief))
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Some(NoteDetail { note, tags })
    }

    pub(crate) fn tags_of(&self, note: NoteId) -> impl Iterator<Item = TagId> + '_ {
        self.note_tags
            .range((note, TagId::from_uuid(uuid::Uuid::nil()))..)
            .take_while(move |(n, _)| *n == note)
            .map(|(_, tag)| *tag)
    }

    // --- tags ------------------------------------------------------------

    pub(crate) fn insert_tag(&mut self, owner: UserId, name: &str) -> AppResult<Tag> {
        if !self.users.contains_key(&owner) {
            return Err(Constraint::OwnerExists.error());
        }
        if self
            .tags
            .values()
            .any(|t| t.owner_id == owner && t.name == name)
        {
            return Err(Constraint::TagName.error());
        }
        let tag = Tag {
            id: TagId::new(),
            owner_id: owner,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    pub(crate) fn rename_tag(&mut self, id: TagId, name: &str) -> AppResult<Tag> {
        let owner = self
            .tags
            .get(&id)
            .map(|t| t.owner_id)
            .ok_or_else(|| AppError::not_found(format!("Tag {id} not found")))?;
        if self
            .tags
            .values()
            .any(|t| t.owner_id == owner && t.name == name && t.id != id)
        {
            return Err(Constraint::TagName.error());
        }
        let tag = self
            .tags
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Tag {id} not found")))?;
        tag.name = name.to_string();
        Ok(tag.clone())
    }

    pub(crate) fn delete_tag(&mut self, id: TagId) -> bool {
        if self.tags.remove(&id).is_none() {
            return false;
        }
        self.note_tags.retain(|(_, tag)| *tag != id);
        true
    }
}
