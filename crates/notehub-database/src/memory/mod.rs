//! In-memory backend implementing every store trait.
//!
//! All data lives in one [`MemoryState`] behind an async mutex. A folder
//! transaction holds the lock for its whole lifetime and works on a private
//! copy that replaces the shared state on commit, so units of work are
//! serializable and a failed one leaves no trace. Uniqueness, referential
//! and cascade rules mirror the PostgreSQL schema.

mod directory;
mod folder;
mod note;
mod state;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use folder::MemoryFolderTx;
pub(crate) use state::MemoryState;

/// Shared in-memory store. Cloning yields another handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
