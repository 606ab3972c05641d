//! Integration tests for the oget CLI
//!
//! These tests require a running S3-compatible endpoint with a pre-seeded
//! bucket reachable through the configured endpoint.
//!
//! Run with:
//! ```bash
//! # Start a MinIO container and seed a bucket named "oget-test"
//! docker run -d --name minio -p 9000:9000 \
//!     -e MINIO_ROOT_USER=accesskey \
//!     -e MINIO_ROOT_PASSWORD=secretkey \
//!     minio/minio server /data
//!
//! # Run tests
//! OGET_ENDPOINT=http://localhost:9000 cargo test --features integration
//! ```

#![cfg(feature = "integration")]

use std::process::{Command, Output};
use tempfile::TempDir;

const STORAGE_URL_BASE: &str = "https://www.googleapis.com/storage/v1";

/// Get the path to the oget binary
fn oget_binary() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_oget") {
        return std::path::PathBuf::from(path);
    }

    let debug = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/debug/oget");

    if debug.exists() {
        return debug;
    }

    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/release/oget")
}

/// Run oget with an isolated configuration directory
fn run_oget(args: &[&str], config_dir: &std::path::Path) -> Output {
    let mut cmd = Command::new(oget_binary());
    cmd.args(args);
    cmd.env("OGET_CONFIG_DIR", config_dir);
    if let Ok(endpoint) = std::env::var("OGET_ENDPOINT") {
        cmd.env("OGET_ENDPOINT", endpoint);
    }
    cmd.env("OGET_ACCESS_KEY", "accesskey");
    cmd.env("OGET_SECRET_KEY", "secretkey");

    cmd.output().expect("Failed to execute oget command")
}

#[test]
fn test_malformed_storage_url_is_usage_error() {
    let config = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let output = run_oget(
        &[
            "get",
            &format!("{STORAGE_URL_BASE}/bucket-only"),
            dest.path().join("out").to_str().unwrap(),
        ],
        config.path(),
    );

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_foreign_url_is_usage_error() {
    let config = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let output = run_oget(
        &[
            "get",
            "https://example.com/some/other/artifact",
            dest.path().join("out").to_str().unwrap(),
        ],
        config.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not address"));
}

#[test]
fn test_missing_object_is_not_found() {
    let config = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let output = run_oget(
        &[
            "get",
            &format!("{STORAGE_URL_BASE}/oget-test/no/such/object.bin"),
            dest.path().join("out.bin").to_str().unwrap(),
        ],
        config.path(),
    );

    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_config_set_and_show_roundtrip() {
    let config = TempDir::new().unwrap();

    let output = run_oget(
        &["config", "set", "--region", "us-central1"],
        config.path(),
    );
    assert!(output.status.success());

    let output = run_oget(&["config", "show", "--json"], config.path());
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("us-central1"));
    // Secrets are masked by default
    assert!(!stdout.contains("secretkey"));
}

#[test]
fn test_completions_generate() {
    let config = TempDir::new().unwrap();

    let output = run_oget(&["completions", "bash"], config.path());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("oget"));
}
