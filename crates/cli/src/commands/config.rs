//! config command - Manage oget configuration
//!
//! Reads and writes the TOML configuration file holding the storage endpoint
//! and credentials.

use clap::{Args, Subcommand};
use serde::Serialize;

use og_core::ConfigManager;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Update configuration values
    Set(SetArgs),

    /// Show the current configuration
    Show(ShowArgs),
}

/// Arguments for config set
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Storage endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Region passed to the SDK
    #[arg(long)]
    pub region: Option<String>,

    /// HMAC access key ID
    #[arg(long)]
    pub access_key: Option<String>,

    /// HMAC secret access key
    #[arg(long)]
    pub secret_key: Option<String>,
}

/// Arguments for config show
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print credentials instead of masking them
    #[arg(long)]
    pub show_secrets: bool,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    endpoint: String,
    region: String,
    access_key: String,
    secret_key: String,
}

/// Execute a config subcommand
pub async fn execute(cmd: ConfigCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match ConfigManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to locate configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    match cmd {
        ConfigCommands::Set(args) => set(&manager, args, &formatter),
        ConfigCommands::Show(args) => show(&manager, args, &formatter),
    }
}

fn set(manager: &ConfigManager, args: SetArgs, formatter: &Formatter) -> ExitCode {
    let mut config = match manager.load() {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(region) = args.region {
        config.region = region;
    }
    if let Some(access_key) = args.access_key {
        config.access_key = access_key;
    }
    if let Some(secret_key) = args.secret_key {
        config.secret_key = secret_key;
    }

    match manager.save(&config) {
        Ok(()) => {
            formatter.success(&format!(
                "Configuration saved to {}",
                manager.config_path().display()
            ));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to save configuration: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

fn show(manager: &ConfigManager, args: ShowArgs, formatter: &Formatter) -> ExitCode {
    let config = match manager.load() {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let mask = |value: &str| -> String {
        if args.show_secrets || value.is_empty() {
            value.to_string()
        } else {
            "********".to_string()
        }
    };

    let output = ShowOutput {
        endpoint: config.endpoint.clone(),
        region: config.region.clone(),
        access_key: mask(&config.access_key),
        secret_key: mask(&config.secret_key),
    };

    if formatter.is_json() {
        formatter.json(&output);
    } else {
        formatter.println(&format!("endpoint    {}", output.endpoint));
        formatter.println(&format!("region      {}", output.region));
        formatter.println(&format!("access_key  {}", output.access_key));
        formatter.println(&format!("secret_key  {}", output.secret_key));
    }
    ExitCode::Success
}
