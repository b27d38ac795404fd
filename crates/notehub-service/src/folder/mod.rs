//! Folder hierarchy and tree services.

pub mod service;
pub mod tree;

pub use service::{CreateFolderRequest, FolderService, UpdateFolderRequest};
pub use tree::TreeService;
