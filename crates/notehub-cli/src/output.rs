//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use notehub_entity::folder::FolderNode;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a folder tree, indented in table mode
pub fn print_tree(tree: &FolderNode, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut lines = Vec::new();
            render_tree(tree, 0, &mut lines);
            println!("{}", lines.join("\n"));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(tree).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

fn render_tree(node: &FolderNode, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{}/  ({})", "  ".repeat(depth), node.name, node.id));
    for child in &node.children {
        render_tree(child, depth + 1, lines);
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_core::types::FolderId;

    #[test]
    fn test_render_tree_indents_children() {
        let tree = FolderNode {
            id: FolderId::new(),
            name: "root".to_string(),
            children: vec![FolderNode {
                id: FolderId::new(),
                name: "Work".to_string(),
                children: vec![],
            }],
        };

        let mut lines = Vec::new();
        render_tree(&tree, 0, &mut lines);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("root/"));
        assert!(lines[1].starts_with("  Work/"));
    }
}
