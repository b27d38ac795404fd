//! # notehub-database
//!
//! Store traits for NoteHub, their PostgreSQL implementations, the
//! connection pool and migrations, and an in-memory backend with the same
//! constraints and cascade rules.

pub mod connection;
pub mod constraint;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod traits;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::PgStores;
pub use traits::{FolderStore, FolderTx, NoteStore, NoteTagStore, TagStore, UserDirectory};
