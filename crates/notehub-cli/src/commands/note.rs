//! Note CLI commands, including tag filtering.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use notehub_core::error::AppError;
use notehub_core::types::TagId;
use notehub_entity::note::{FilterMode, NoteDetail, NoteSummary};
use notehub_service::RequestContext;
use notehub_service::note::CreateNoteRequest;

use super::{App, parse_id};
use crate::output::{self, OutputFormat};

/// Arguments for note commands
#[derive(Debug, Args)]
pub struct NoteArgs {
    /// Acting username
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Note subcommand
    #[command(subcommand)]
    pub command: NoteCommand,
}

/// Note subcommands
#[derive(Debug, Subcommand)]
pub enum NoteCommand {
    /// Create a note
    Create {
        /// Folder ID (the root when omitted)
        #[arg(long)]
        folder: Option<String>,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Body
        #[arg(long, default_value = "")]
        content: String,
        /// Tag names, comma-separated
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List notes of a folder, or all notes of the user
    List {
        /// Folder ID
        #[arg(long, conflicts_with = "full")]
        folder: Option<String>,
        /// Show content and tags of every note of the user
        #[arg(long)]
        full: bool,
    },
    /// Filter the user's notes by tags
    Filter {
        /// Tag names, comma-separated
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// `and` (every tag) or `or` (any tag); anything else means `and`
        #[arg(long)]
        mode: Option<String>,
    },
}

/// Note display row
#[derive(Debug, Serialize, Tabled)]
struct NoteRow {
    /// Note ID
    id: String,
    /// Title
    title: String,
    /// Folder ID
    folder_id: String,
    /// Updated at
    updated_at: String,
}

impl From<&NoteSummary> for NoteRow {
    fn from(n: &NoteSummary) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title.clone(),
            folder_id: n.folder_id.to_string(),
            updated_at: super::timestamp(&n.updated_at),
        }
    }
}

/// Full note display row
#[derive(Debug, Serialize, Tabled)]
struct NoteDetailRow {
    /// Note ID
    id: String,
    /// Title
    title: String,
    /// Tag names
    tags: String,
    /// Body
    content: String,
    /// Updated at
    updated_at: String,
}

impl From<&NoteDetail> for NoteDetailRow {
    fn from(d: &NoteDetail) -> Self {
        Self {
            id: d.note.id.to_string(),
            title: d.note.title.clone(),
            tags: d
                .tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            content: d.note.content.clone(),
            updated_at: super::timestamp(&d.note.updated_at),
        }
    }
}

/// Resolve tag names of the acting user into IDs.
async fn tag_ids(
    app: &App,
    ctx: &RequestContext,
    names: &[String],
) -> Result<Vec<TagId>, AppError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let owned = app.services.tags.list_by_user(ctx).await?;
    names
        .iter()
        .map(|name| {
            owned
                .iter()
                .find(|t| t.name == *name)
                .map(|t| t.id)
                .ok_or_else(|| AppError::not_found(format!("Tag '{name}' not found")))
        })
        .collect()
}

/// Execute note commands
pub async fn execute(args: &NoteArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    let username = args
        .user
        .as_deref()
        .ok_or_else(|| AppError::invalid_argument("--user is required for note commands"))?;
    let ctx = app.acting_as(username).await?;

    match &args.command {
        NoteCommand::Create {
            folder,
            title,
            content,
            tags,
        } => {
            let folder_id = match folder {
                Some(raw) => parse_id(raw, "folder")?,
                None => app.services.folders.get_or_create_root(&ctx).await?.id,
            };
            let note = app
                .services
                .notes
                .create(
                    &ctx,
                    CreateNoteRequest {
                        folder_id,
                        title: title.clone(),
                        content: content.clone(),
                        tag_ids: tag_ids(app, &ctx, tags).await?,
                    },
                )
                .await?;
            output::print_list(&[NoteRow::from(&note.summary())], format);
        }
        NoteCommand::List { full: true, .. } => {
            let notes = app.services.notes.list_full_by_user(&ctx).await?;
            let rows: Vec<NoteDetailRow> = notes.iter().map(NoteDetailRow::from).collect();
            output::print_list(&rows, format);
        }
        NoteCommand::List { folder, .. } => {
            let notes = match folder {
                Some(raw) => {
                    app.services
                        .notes
                        .list_by_folder(&ctx, parse_id(raw, "folder")?)
                        .await?
                }
                None => app.services.notes.list_by_user(&ctx).await?,
            };
            let rows: Vec<NoteRow> = notes.iter().map(NoteRow::from).collect();
            output::print_list(&rows, format);
        }
        NoteCommand::Filter { tags, mode } => {
            let ids = tag_ids(app, &ctx, tags).await?;
            let notes = app
                .services
                .filter
                .filter_by_tags(&ctx, &ids, FilterMode::from_optional(mode.as_deref()))
                .await?;
            let rows: Vec<NoteRow> = notes.iter().map(NoteRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
