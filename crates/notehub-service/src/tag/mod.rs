//! Tag services.

pub mod service;

pub use service::{CreateTagRequest, RenameTagRequest, TagService};
