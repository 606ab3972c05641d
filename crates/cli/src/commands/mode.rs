//! mode command - Classify a storage URL
//!
//! Runs only the classification probe: reports whether a fetch of the URL
//! would transfer a single file or a directory collection.

use clap::Args;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use og_core::{Fetcher, TransferMode};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Classify a storage URL without fetching
#[derive(Args, Debug)]
pub struct ModeArgs {
    /// Storage URL (https://www.googleapis.com/storage/v1/<container>/<key>)
    pub url: String,
}

#[derive(Debug, Serialize)]
struct ModeOutput {
    url: String,
    mode: TransferMode,
}

/// Execute the mode command
pub async fn execute(args: ModeArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let location = match super::resolve_location(&args.url, &formatter) {
        Ok(location) => location,
        Err(code) => return code,
    };

    let client = match super::build_client(&formatter).await {
        Ok(client) => client,
        Err(code) => return code,
    };

    let fetcher = Fetcher::new(&client);
    match fetcher.detect_mode(&location, &CancellationToken::new()).await {
        Ok(mode) => {
            if formatter.is_json() {
                formatter.json(&ModeOutput {
                    url: args.url,
                    mode,
                });
            } else {
                formatter.println(&mode.to_string());
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to classify {location}: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
