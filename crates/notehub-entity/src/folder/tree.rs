//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use notehub_core::types::FolderId;

/// A node in a materialized folder tree.
///
/// Children are ordered by name ascending at every level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Child folder nodes.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Number of folders in this subtree, including this node.
    pub fn total_folders(&self) -> usize {
        1 + self.children.iter().map(Self::total_folders).sum::<usize>()
    }

    /// Names of the direct children, in display order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// Follow a path of child names downward from this node.
    pub fn descend(&self, path: &[&str]) -> Option<&FolderNode> {
        let mut node = self;
        for segment in path {
            node = node.children.iter().find(|c| c.name == *segment)?;
        }
        Some(node)
    }
}
