//! Folder hierarchy CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use notehub_core::error::AppError;
use notehub_core::types::FolderId;
use notehub_entity::folder::Folder;
use notehub_service::folder::{CreateFolderRequest, UpdateFolderRequest};

use super::{App, parse_id};
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Acting username
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Show the user's whole folder tree
    Tree,
    /// List the children of a folder (the root when omitted)
    Children {
        /// Parent folder ID
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for the root)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a folder in place
    Rename {
        /// Folder ID
        id: String,
        /// New name
        name: String,
    },
    /// Move a folder under another parent (the root when omitted)
    Move {
        /// Folder ID
        id: String,
        /// New parent folder ID
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Delete a folder with all its subfolders and notes
    Delete {
        /// Folder ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent ID
    parent_id: String,
    /// Updated at
    updated_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            parent_id: f.parent_id.map(|p| p.to_string()).unwrap_or_default(),
            updated_at: super::timestamp(&f.updated_at),
        }
    }
}

fn optional_id(raw: Option<&str>) -> Result<Option<FolderId>, AppError> {
    raw.map(|r| parse_id(r, "folder")).transpose()
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    let username = args
        .user
        .as_deref()
        .ok_or_else(|| AppError::invalid_argument("--user is required for folder commands"))?;
    let ctx = app.acting_as(username).await?;
    let folders = &app.services.folders;

    match &args.command {
        FolderCommand::Tree => {
            folders.get_or_create_root(&ctx).await?;
            let tree = app.services.trees.materialize_tree(&ctx).await?;
            output::print_tree(&tree, format);
        }
        FolderCommand::Children { parent } => {
            let children = match optional_id(parent.as_deref())? {
                Some(id) => folders.list_children(id).await?,
                None => folders.list_root_children(&ctx).await?,
            };
            let rows: Vec<FolderRow> = children.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name, parent } => {
            let folder = folders
                .create(
                    &ctx,
                    CreateFolderRequest {
                        name: name.clone(),
                        parent_id: optional_id(parent.as_deref())?,
                    },
                )
                .await?;
            output::print_list(&[FolderRow::from(&folder)], format);
        }
        FolderCommand::Rename { id, name } => {
            let id = parse_id(id, "folder")?;
            let current = folders.get(id).await?;
            let folder = folders
                .update(
                    &ctx,
                    id,
                    UpdateFolderRequest {
                        name: name.clone(),
                        parent_id: current.parent_id,
                    },
                )
                .await?;
            output::print_success(&format!("Folder renamed to '{}'", folder.name));
        }
        FolderCommand::Move { id, parent } => {
            let id = parse_id(id, "folder")?;
            let current = folders.get(id).await?;
            let folder = folders
                .update(
                    &ctx,
                    id,
                    UpdateFolderRequest {
                        name: current.name,
                        parent_id: optional_id(parent.as_deref())?,
                    },
                )
                .await?;
            output::print_list(&[FolderRow::from(&folder)], format);
        }
        FolderCommand::Delete { id, force } => {
            let id = parse_id(id, "folder")?;
            let folder = folders.get(id).await?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete '{}' with every subfolder and note inside it?",
                        folder.name
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            folders.delete(&ctx, id).await?;
            output::print_success(&format!("Folder '{}' deleted", folder.name));
        }
    }

    Ok(())
}
