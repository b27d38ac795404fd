//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use notehub_core::error::AppError;
use notehub_database::FolderStore;
use notehub_entity::user::User;
use notehub_service::user::{CreateUserRequest, UpdateUserRequest};

use super::App;
use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a user and create their root folder
    Create {
        /// Username
        username: String,
    },
    /// Show a user
    Show {
        /// Username
        username: String,
    },
    /// List every user
    List,
    /// Change a username
    Rename {
        /// Current username
        username: String,
        /// New username
        new_username: String,
    },
    /// Delete a user with all their folders, notes and tags
    Delete {
        /// Username
        username: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username.clone(),
            created_at: super::timestamp(&u.created_at),
        }
    }
}

/// Execute user commands
pub async fn execute(args: &UserArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        UserCommand::Create { username } => {
            let user = app
                .services
                .users
                .create(CreateUserRequest {
                    username: username.clone(),
                })
                .await?;
            let ctx = app.acting_as(&user.username).await?;
            let root = app.services.folders.get_or_create_root(&ctx).await?;

            output::print_list(&[UserRow::from(&user)], format);
            output::print_success(&format!(
                "User '{}' created with root folder {}",
                user.username, root.id
            ));
        }
        UserCommand::Show { username } => {
            let user = app.services.users.get_by_username(username).await?;
            let root = app.stores.folders.find_root(user.id).await?;

            match format {
                OutputFormat::Json => output::print_list(&[UserRow::from(&user)], format),
                OutputFormat::Table => {
                    println!("User '{}'", user.username);
                    output::print_kv("ID", &user.id.to_string());
                    output::print_kv("Created", &super::timestamp(&user.created_at));
                    output::print_kv(
                        "Root folder",
                        &root.map(|r| r.id.to_string()).unwrap_or_else(|| "-".to_string()),
                    );
                }
            }
        }
        UserCommand::List => {
            let users = app.services.users.list().await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Rename {
            username,
            new_username,
        } => {
            let user = app.services.users.get_by_username(username).await?;
            let renamed = app
                .services
                .users
                .update(
                    user.id,
                    UpdateUserRequest {
                        username: new_username.clone(),
                    },
                )
                .await?;
            output::print_success(&format!(
                "User '{username}' renamed to '{}'",
                renamed.username
            ));
        }
        UserCommand::Delete { username, force } => {
            let user = app.services.users.get_by_username(username).await?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete user '{username}' with every folder, note and tag?"
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            app.services.users.delete(user.id).await?;
            output::print_success(&format!("User '{username}' deleted"));
        }
    }

    Ok(())
}
