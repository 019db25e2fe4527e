//! Nexo Drive command-line client.
//!
//! Main entry point: parses arguments, loads configuration, initializes
//! logging and hands the command to `nexo-cli`.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use nexo_cli::Cli;
use nexo_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("✗ Failed to load configuration: {}", e.message);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!(provider = ?config.backend.provider, "Configuration loaded");

    if cli.execute(config).await.is_err() {
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. Logs go to stderr so command output stays clean.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
