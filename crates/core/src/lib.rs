//! og-core: Core library for the oget object-storage fetcher
//!
//! This crate provides the core functionality for oget, including:
//! - Storage URL parsing and resolution
//! - File-vs-directory classification of fetch targets
//! - Single-object and prefix-tree transfer strategies
//! - A cancellable byte-streaming copy primitive
//! - Configuration management
//!
//! The storage backend is reached through the [`ObjectReader`] trait, keeping
//! this crate independent of any specific SDK.

pub mod config;
pub mod copy;
pub mod error;
pub mod fetch;
pub mod location;
pub mod reader;

pub use config::{Config, ConfigManager};
pub use copy::copy_cancellable;
pub use error::{Error, Result};
pub use fetch::{FetchOutcome, Fetcher, TransferMode};
pub use location::{parse_location, parse_location_str, Location, LocationMatch};
pub use reader::{ListOptions, ListPage, ObjectDescriptor, ObjectReader, ObjectStream};
