//! CLI command definitions and dispatch.

pub mod folder;
pub mod migrate;
pub mod note;
pub mod tag;
pub mod user;

use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing::debug;

use notehub_core::config::AppConfig;
use notehub_core::error::AppError;
use notehub_database::{DatabasePool, PgStores};
use notehub_service::{RequestContext, Services};

use crate::output::OutputFormat;

/// NoteHub: folders, notes and tags for every user
#[derive(Debug, Parser)]
#[command(name = "notehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Folder hierarchy management
    Folder(folder::FolderArgs),
    /// Note management and tag filtering
    Note(note::NoteArgs),
    /// Tag management
    Tag(tag::TagArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let pool = DatabasePool::connect(&config.database).await?;
        let app = App::new(pool, config);
        let result = match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &app).await,
            Commands::User(args) => user::execute(args, &app, self.format).await,
            Commands::Folder(args) => folder::execute(args, &app, self.format).await,
            Commands::Note(args) => note::execute(args, &app, self.format).await,
            Commands::Tag(args) => tag::execute(args, &app, self.format).await,
        };
        app.pool.close().await;
        result
    }
}

/// Services and raw stores over one pool.
pub struct App {
    /// Connection pool.
    pub pool: DatabasePool,
    /// Every service.
    pub services: Services,
    /// Stores, for lookups the services do not expose.
    pub stores: PgStores,
}

impl App {
    fn new(pool: DatabasePool, config: &AppConfig) -> Self {
        let stores = pool.stores();
        Self {
            services: Services::new(stores.clone(), config.limits.clone()),
            stores,
            pool,
        }
    }

    /// Resolve a username into the context of that user.
    pub async fn acting_as(&self, username: &str) -> Result<RequestContext, AppError> {
        let user = self.services.users.get_by_username(username).await?;
        debug!(user_id = %user.id, username, "Acting as user");
        Ok(RequestContext::new(user.id))
    }
}

/// Parse a typed ID from a command-line argument.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_argument(format!("Invalid {what} ID: '{raw}'")))
}

/// Format a timestamp for table output.
pub fn timestamp(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
