//! Database migration runner.

use std::collections::HashSet;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::{info, warn};

use notehub_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// How far the database schema is from the embedded migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migrations recorded as applied.
    pub applied: usize,
    /// Embedded migrations not yet applied.
    pub pending: usize,
}

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Drop every NoteHub table and the migration history, then re-run all
/// migrations.
pub async fn reset_database(pool: &PgPool) -> Result<(), AppError> {
    warn!("Dropping all NoteHub tables");

    sqlx::raw_sql(
        "DROP TABLE IF EXISTS note_tags, notes, tags, folders, users, _sqlx_migrations CASCADE",
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to drop tables", e))?;

    run_migrations(pool).await
}

/// Compare the applied migration history against the embedded migrations.
pub async fn migration_status(pool: &PgPool) -> Result<MigrationStatus, AppError> {
    let has_history: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to inspect migrations", e)
            })?;

    let applied: HashSet<i64> = if has_history {
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to read migration history", e)
            })?
            .into_iter()
            .collect()
    } else {
        HashSet::new()
    };

    let pending = MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration() && !applied.contains(&m.version))
        .count();

    Ok(MigrationStatus {
        applied: applied.len(),
        pending,
    })
}
