//! Store traits implemented by every persistence backend.
//!
//! Services depend on these traits rather than on a concrete backend, so the
//! same hierarchy and filtering rules run against PostgreSQL in production
//! and against [`crate::memory::MemoryStore`] in tests.

use async_trait::async_trait;

use notehub_core::result::AppResult;
use notehub_core::types::{FolderId, NoteId, TagId, UserId};
use notehub_entity::folder::{CreateFolder, Folder};
use notehub_entity::note::{CreateNote, Note, NoteDetail, NoteSummary};
use notehub_entity::tag::Tag;
use notehub_entity::user::User;

/// User existence and lookup.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Check whether a user with this ID exists.
    async fn exists(&self, id: UserId) -> AppResult<bool>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Every user, ordered by username.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Register a user. Usernames are unique.
    async fn create(&self, username: &str) -> AppResult<User>;

    /// Change a user's username.
    async fn rename(&self, id: UserId, username: &str) -> AppResult<User>;

    /// Delete a user with every folder, note, tag and note link they own.
    /// Returns `true` if deleted.
    async fn delete(&self, id: UserId) -> AppResult<bool>;
}

/// Tag persistence. Names are unique per owner.
#[async_trait]
pub trait TagStore: Send + Sync + 'static {
    /// Find a tag by ID.
    async fn find_by_id(&self, id: TagId) -> AppResult<Option<Tag>>;

    /// Fetch every tag whose ID is in `ids`. Missing IDs are skipped.
    async fn find_many(&self, ids: &[TagId]) -> AppResult<Vec<Tag>>;

    /// List a user's tags ordered by name.
    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Tag>>;

    /// Create a tag.
    async fn create(&self, owner: UserId, name: &str) -> AppResult<Tag>;

    /// Rename a tag.
    async fn rename(&self, id: TagId, name: &str) -> AppResult<Tag>;

    /// Delete a tag together with its note links. Returns `true` if deleted.
    async fn delete(&self, id: TagId) -> AppResult<bool>;
}

/// Folder reads and the entry point for hierarchy mutations.
#[async_trait]
pub trait FolderStore: Send + Sync + 'static {
    /// Open a unit of work. All hierarchy mutations go through one.
    async fn begin(&self) -> AppResult<Box<dyn FolderTx>>;

    /// Find a folder by ID.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find the user's root folder.
    async fn find_root(&self, owner: UserId) -> AppResult<Option<Folder>>;

    /// Direct children of a folder, ordered by name (byte-wise).
    async fn find_children(&self, parent: FolderId) -> AppResult<Vec<Folder>>;

    /// Every descendant of `root`, excluding `root` itself.
    async fn find_subtree(&self, root: FolderId) -> AppResult<Vec<Folder>>;

    /// The folder followed by each of its ancestors up to the root.
    async fn find_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>>;
}

/// A single atomic unit of work over the folder hierarchy.
///
/// Nothing written through a `FolderTx` is visible to other callers until
/// [`FolderTx::commit`] succeeds. Dropping an uncommitted transaction rolls
/// it back.
#[async_trait]
pub trait FolderTx: Send {
    /// Find a folder by ID.
    async fn find_by_id(&mut self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Serialize hierarchy mutations for one owner until commit or rollback.
    async fn lock_owner_tree(&mut self, owner: UserId) -> AppResult<()>;

    /// Return the owner's root folder, creating it if absent.
    ///
    /// Concurrent callers converge on the same row: a storage-level
    /// uniqueness rule allows at most one root per owner.
    async fn ensure_root(&mut self, owner: UserId) -> AppResult<Folder>;

    /// Whether `parent` already has a child called `name`, ignoring `excluding`.
    async fn sibling_exists(
        &mut self,
        owner: UserId,
        parent: FolderId,
        name: &str,
        excluding: Option<FolderId>,
    ) -> AppResult<bool>;

    /// `id` followed by each of its ancestor IDs up to the root.
    async fn ancestor_ids(&mut self, id: FolderId) -> AppResult<Vec<FolderId>>;

    /// Insert a non-root folder.
    async fn insert(&mut self, data: CreateFolder) -> AppResult<Folder>;

    /// Rename and/or re-parent a folder.
    async fn update(&mut self, id: FolderId, name: &str, parent: FolderId) -> AppResult<Folder>;

    /// Delete a folder with every descendant folder, note, and note link.
    async fn delete(&mut self, id: FolderId) -> AppResult<bool>;

    /// Publish every change made through this transaction.
    async fn commit(&mut self) -> AppResult<()>;
}

/// Note persistence and the note queries used by tag filtering.
///
/// Every list returns summaries ordered by `updated_at` descending, ties
/// broken by ascending note ID.
#[async_trait]
pub trait NoteStore: Send + Sync + 'static {
    /// Find a note by ID.
    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>>;

    /// Find a note together with its tags.
    async fn find_detail(&self, id: NoteId) -> AppResult<Option<NoteDetail>>;

    /// Insert a note and link it to `tag_ids` atomically.
    async fn create(&self, data: CreateNote, tag_ids: &[TagId]) -> AppResult<Note>;

    /// Overwrite a note and replace its tag links atomically.
    async fn update(&self, id: NoteId, data: CreateNote, tag_ids: &[TagId]) -> AppResult<Note>;

    /// Delete a note and its links. Returns `true` if deleted.
    async fn delete(&self, id: NoteId) -> AppResult<bool>;

    /// Notes stored directly in `folder`.
    async fn list_by_folder(&self, folder: FolderId) -> AppResult<Vec<NoteSummary>>;

    /// Every note in any folder owned by `owner`.
    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<NoteSummary>>;

    /// Every note of `owner` with its content and tags.
    async fn list_details_by_owner(&self, owner: UserId) -> AppResult<Vec<NoteDetail>>;

    /// Notes of `owner` linked to at least one of `tags`.
    async fn list_by_any_tag(&self, owner: UserId, tags: &[TagId]) -> AppResult<Vec<NoteSummary>>;

    /// Notes of `owner` linked to every one of `tags`.
    ///
    /// `tags` must be free of duplicates.
    async fn list_by_all_tags(&self, owner: UserId, tags: &[TagId])
    -> AppResult<Vec<NoteSummary>>;
}

/// The note to tag association.
#[async_trait]
pub trait NoteTagStore: Send + Sync + 'static {
    /// Link a note and a tag. Linking twice is a no-op.
    async fn attach(&self, note: NoteId, tag: TagId) -> AppResult<()>;

    /// Unlink a note and a tag. Returns `true` if a link was removed.
    async fn detach(&self, note: NoteId, tag: TagId) -> AppResult<bool>;

    /// IDs of every tag linked to `note`.
    async fn tag_ids_for_note(&self, note: NoteId) -> AppResult<Vec<TagId>>;
}
