//! Database migration management commands.

use clap::{Args, Subcommand};

use notehub_core::error::AppError;
use notehub_database::migration;

use super::App;
use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check connectivity and report applied and pending migrations
    Status,
    /// Reset database (drop all tables and re-run)
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, app: &App) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(app.pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            if !app.pool.health_check().await? {
                return Err(AppError::database("Database did not answer the health check"));
            }
            let status = migration::migration_status(app.pool.pool()).await?;
            output::print_kv("Database", "reachable");
            output::print_kv("Applied", &status.applied.to_string());
            output::print_kv("Pending", &status.pending.to_string());
            if status.pending > 0 {
                output::print_warning("Run `notehub migrate run` to apply pending migrations.");
            }
        }
        MigrateCommand::Reset { force } => {
            if !force {
                output::print_warning("Every folder, note and tag will be lost.");
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("This will DROP all tables and re-run migrations. Continue?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            println!("Resetting database...");
            migration::reset_database(app.pool.pool()).await?;
            output::print_success("Database reset complete.");
        }
    }

    Ok(())
}
