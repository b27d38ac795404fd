//! Tag CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use notehub_core::error::AppError;
use notehub_entity::tag::Tag;
use notehub_service::RequestContext;
use notehub_service::tag::{CreateTagRequest, RenameTagRequest};

use super::App;
use crate::output::{self, OutputFormat};

/// Arguments for tag commands
#[derive(Debug, Args)]
pub struct TagArgs {
    /// Acting username
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Tag subcommand
    #[command(subcommand)]
    pub command: TagCommand,
}

/// Tag subcommands
#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// Create a tag
    Create {
        /// Tag name
        name: String,
    },
    /// List the user's tags
    List,
    /// Rename a tag
    Rename {
        /// Current name
        name: String,
        /// New name
        new_name: String,
    },
    /// Delete a tag and detach it from every note
    Delete {
        /// Tag name
        name: String,
    },
}

/// Tag display row
#[derive(Debug, Serialize, Tabled)]
struct TagRow {
    /// Tag ID
    id: String,
    /// Name
    name: String,
    /// Created at
    created_at: String,
}

impl From<&Tag> for TagRow {
    fn from(t: &Tag) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            created_at: super::timestamp(&t.created_at),
        }
    }
}

async fn find_by_name(app: &App, ctx: &RequestContext, name: &str) -> Result<Tag, AppError> {
    app.services
        .tags
        .list_by_user(ctx)
        .await?
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| AppError::not_found(format!("Tag '{name}' not found")))
}

/// Execute tag commands
pub async fn execute(args: &TagArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    let username = args
        .user
        .as_deref()
        .ok_or_else(|| AppError::invalid_argument("--user is required for tag commands"))?;
    let ctx = app.acting_as(username).await?;
    let tags = &app.services.tags;

    match &args.command {
        TagCommand::Create { name } => {
            let tag = tags
                .create(&ctx, CreateTagRequest { name: name.clone() })
                .await?;
            output::print_list(&[TagRow::from(&tag)], format);
        }
        TagCommand::List => {
            let owned = tags.list_by_user(&ctx).await?;
            let rows: Vec<TagRow> = owned.iter().map(TagRow::from).collect();
            output::print_list(&rows, format);
        }
        TagCommand::Rename { name, new_name } => {
            let tag = find_by_name(app, &ctx, name).await?;
            let renamed = tags
                .rename(
                    &ctx,
                    tag.id,
                    RenameTagRequest {
                        name: new_name.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Tag '{}' renamed to '{}'", name, renamed.name));
        }
        TagCommand::Delete { name } => {
            let tag = find_by_name(app, &ctx, name).await?;
            tags.delete(&ctx, tag.id).await?;
            output::print_success(&format!("Tag '{name}' deleted"));
        }
    }

    Ok(())
}
