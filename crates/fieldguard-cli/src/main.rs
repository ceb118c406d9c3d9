//! Fieldguard CLI
//!
//! Filters JSON resources against attribute-level grants.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use fieldguard_cli::cli::{Cli, Command};
use fieldguard_cli::commands::handle_filter_command;
use fieldguard_cli::config_handlers::handle_config_command;
use fieldguard_cli::CliConfig;

/// Logs go to stderr so stdout carries only command output.
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Config { action } => {
            init_logging("warn");
            handle_config_command(cli.config.as_deref(), action)?;
        }
        Command::Filter(args) => {
            let config = CliConfig::load(cli.config.as_deref())?;
            init_logging(&config.logging.level);
            tracing::debug!(audit = config.acl.audit.enabled, "Loaded configuration");

            let output = handle_filter_command(&config, &args).await?;
            println!("{output}");
        }
    }

    Ok(())
}
