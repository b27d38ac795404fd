//! Core traits shared by the NoteHub crates.

pub mod service;

pub use service::Service;
