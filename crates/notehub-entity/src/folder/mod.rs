//! Folder domain entities.

pub mod contents;
pub mod model;
pub mod tree;

pub use contents::FolderContents;
pub use model::{CreateFolder, Folder, ROOT_FOLDER_NAME};
pub use tree::FolderNode;
