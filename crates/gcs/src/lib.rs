//! og-gcs: storage backend adapter for oget
//!
//! This crate provides the implementation of the ObjectReader trait using the
//! aws-sdk-s3 crate against the backend's S3-interoperability endpoint. It is
//! the only crate that directly depends on the AWS SDK.

pub mod client;

pub use client::GcsClient;
