//! get command - Fetch objects to local disk
//!
//! Classifies the target as a single object or a prefix collection, then runs
//! the matching transfer. Ctrl+C and --timeout cancel the whole transfer,
//! down to byte granularity inside an in-flight copy.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use og_core::{FetchOutcome, Fetcher, TransferMode};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Fetch a file or directory tree
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Storage URL (https://www.googleapis.com/storage/v1/<container>/<key>)
    pub url: String,

    /// Local destination path
    pub dest: PathBuf,

    /// Force the transfer mode instead of probing the backend
    #[arg(long, value_enum, default_value_t = ModeOverride::Auto)]
    pub mode: ModeOverride,

    /// Abort the transfer after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Transfer mode selection for --mode
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeOverride {
    /// Probe the backend and decide
    Auto,
    /// Treat the key as a single object
    File,
    /// Treat the key as a prefix collection
    Dir,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    url: String,
    dest: String,
    mode: TransferMode,
    objects: u64,
    bytes: u64,
    bytes_human: String,
}

/// Execute the get command
pub async fn execute(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let location = match super::resolve_location(&args.url, &formatter) {
        Ok(location) => location,
        Err(code) => return code,
    };

    let client = match super::build_client(&formatter).await {
        Ok(client) => client,
        Err(code) => return code,
    };

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());
    if let Some(secs) = args.timeout {
        spawn_timeout(cancel.clone(), Duration::from_secs(secs));
    }

    let fetcher = Fetcher::new(&client);
    let spinner = ProgressBar::spinner(&output_config, &format!("fetching {location}"));

    let result = match args.mode {
        ModeOverride::Auto => fetcher.fetch(&location, &args.dest, &cancel).await,
        ModeOverride::File => fetcher
            .fetch_file(&location, &args.dest, &cancel)
            .await
            .map(|bytes| FetchOutcome {
                mode: TransferMode::File,
                objects: 1,
                bytes,
            }),
        ModeOverride::Dir => fetcher.fetch_dir(&location, &args.dest, &cancel).await,
    };
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            report_success(&args, &outcome, &formatter);
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to fetch {location}: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

fn report_success(args: &GetArgs, outcome: &FetchOutcome, formatter: &Formatter) {
    let bytes_human = humansize::format_size(outcome.bytes, humansize::BINARY);
    let dest = args.dest.display().to_string();

    if formatter.is_json() {
        let output = GetOutput {
            status: "success",
            url: args.url.clone(),
            dest,
            mode: outcome.mode,
            objects: outcome.objects,
            bytes: outcome.bytes,
            bytes_human,
        };
        formatter.json(&output);
        return;
    }

    match outcome.mode {
        TransferMode::File => {
            formatter.println(&format!("{} -> {dest} ({bytes_human})", args.url));
        }
        TransferMode::Directory => {
            formatter.success(&format!(
                "Fetched {} object(s) ({bytes_human}) to {dest}",
                outcome.objects
            ));
        }
    }
}

/// Cancel the transfer on Ctrl+C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling transfer");
            cancel.cancel();
        }
    });
}

/// Cancel the transfer once the deadline passes
fn spawn_timeout(cancel: CancellationToken, after: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        tracing::warn!(?after, "timeout reached, cancelling transfer");
        cancel.cancel();
    });
}
