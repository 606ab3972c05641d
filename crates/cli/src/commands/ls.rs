//! ls command - List objects under a prefix
//!
//! Pages through the backend listing and prints size, date, and key for each
//! object whose key starts with the URL's key.

use clap::Args;
use serde::Serialize;

use og_core::{ListOptions, ObjectDescriptor, ObjectReader as _};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List objects under a storage URL prefix
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Storage URL (https://www.googleapis.com/storage/v1/<container>/<prefix>)
    pub url: String,

    /// Stop after listing this many objects
    #[arg(long)]
    pub max_keys: Option<usize>,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput {
    items: Vec<ObjectDescriptor>,
    truncated: bool,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let location = match super::resolve_location(&args.url, &formatter) {
        Ok(location) => location,
        Err(code) => return code,
    };

    let client = match super::build_client(&formatter).await {
        Ok(client) => client,
        Err(code) => return code,
    };

    let mut items: Vec<ObjectDescriptor> = Vec::new();
    let mut truncated = false;
    let mut continuation_token: Option<String> = None;

    loop {
        let options = ListOptions {
            continuation_token: continuation_token.take(),
            ..Default::default()
        };

        let page = match client.list(&location.container, &location.key, options).await {
            Ok(page) => page,
            Err(e) => {
                formatter.error(&format!("Failed to list {location}: {e}"));
                return ExitCode::from_error(&e);
            }
        };

        items.extend(page.objects);

        if let Some(max) = args.max_keys {
            if items.len() >= max {
                truncated = page.truncated || items.len() > max;
                items.truncate(max);
                break;
            }
        }

        if page.truncated {
            continuation_token = page.continuation_token;
        } else {
            break;
        }
    }

    if formatter.is_json() {
        formatter.json(&LsOutput { items, truncated });
        return ExitCode::Success;
    }

    if items.is_empty() {
        formatter.warning(&format!("No objects under {location}"));
        return ExitCode::Success;
    }

    for item in &items {
        let size = item.size_human.as_deref().unwrap_or("-");
        let modified = item
            .last_modified
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "-".to_string());
        formatter.println(&format!("{size:>10}  {modified:<24}  {}", item.key));
    }

    ExitCode::Success
}
