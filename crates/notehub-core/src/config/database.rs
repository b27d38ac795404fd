//! PostgreSQL settings for the note store.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Where the note store lives and how many connections it may hold.
///
/// Hierarchy mutations keep a connection for the whole transaction while
/// they hold the per-user tree lock, so `max_connections` bounds how many
/// users can reorganize folders at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` connection URL. Required.
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a free connection before failing the request.
    #[serde(default = "DatabaseConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Seconds before an unused connection is closed.
    #[serde(default = "DatabaseConfig::default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        10
    }

    fn default_min_connections() -> u32 {
        1
    }

    fn default_connect_timeout() -> u64 {
        10
    }

    fn default_idle_timeout() -> u64 {
        300
    }

    /// How long to wait for a pooled connection.
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// How long an idle connection is kept open.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }

    /// Reject pool settings sqlx would misbehave with.
    pub fn check_pool_bounds(&self) -> Result<(), AppError> {
        if self.max_connections == 0 {
            return Err(AppError::configuration(
                "database.max_connections must be at least 1",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(AppError::configuration(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }
}
