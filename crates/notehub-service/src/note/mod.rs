//! Note services and the tag filter engine.

pub mod filter;
pub mod service;

pub use filter::TagFilterService;
pub use service::{CreateNoteRequest, NoteService, UpdateNoteRequest};
