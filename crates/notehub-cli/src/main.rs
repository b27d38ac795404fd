//! NoteHub CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use notehub_core::config::{AppConfig, LoggingConfig};

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(2);
        }
    };

    init_tracing(&config.logging);

    if let Err(e) = cli.execute(&config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}
