//! Note domain entities.

pub mod filter;
pub mod model;

pub use filter::FilterMode;
pub use model::{CreateNote, Note, NoteDetail, NoteSummary, sort_recent_first};
