//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.

use clap::{Parser, Subcommand};

use og_core::{parse_location_str, ConfigManager, Location};
use og_gcs::GcsClient;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod config;
pub mod get;
mod ls;
mod mode;

/// oget - object storage fetcher
///
/// Fetches a file or a whole directory tree from a storage URL, deciding
/// which by probing the backend.
#[derive(Parser, Debug)]
#[command(name = "oget")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress indication
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a file or directory tree to a local destination
    Get(get::GetArgs),

    /// Classify a storage URL as file or directory without fetching
    Mode(mode::ModeArgs),

    /// List objects under a storage URL prefix
    Ls(ls::LsArgs),

    /// Manage oget configuration
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Get(args) => get::execute(args, output_config).await,
        Commands::Mode(args) => mode::execute(args, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Config(cmd) => config::execute(cmd, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Resolve a storage URL argument into a Location, reporting failures
pub(crate) fn resolve_location(url: &str, formatter: &Formatter) -> Result<Location, ExitCode> {
    match parse_location_str(url) {
        Ok(resolved) => match resolved.into_location() {
            Some(location) => Ok(location),
            None => {
                formatter.error(&format!(
                    "'{url}' does not address {} storage",
                    og_core::location::PROVIDER_DOMAIN
                ));
                Err(ExitCode::UsageError)
            }
        },
        Err(e) => {
            formatter.error(&e.to_string());
            Err(ExitCode::from_error(&e))
        }
    }
}

/// Load the configuration (with env overrides) and build the backend client
pub(crate) async fn build_client(formatter: &Formatter) -> Result<GcsClient, ExitCode> {
    let manager = match ConfigManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to locate configuration: {e}"));
            return Err(ExitCode::from_error(&e));
        }
    };

    let mut config = match manager.load() {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to load configuration: {e}"));
            return Err(ExitCode::from_error(&e));
        }
    };
    config.apply_env_overrides();

    match GcsClient::new(config).await {
        Ok(client) => Ok(client),
        Err(e) => {
            formatter.error(&format!("Failed to create storage client: {e}"));
            Err(ExitCode::from_error(&e))
        }
    }
}
