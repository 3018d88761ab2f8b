//! Durable object store for published assets.
//!
//! This crate provides:
//! - The `ObjectStore` capability the pipeline publishes through
//! - An S3-compatible client (Cloudflare R2 style endpoint configuration)
//! - Key helpers for the two publish folders

pub mod client;
pub mod error;
pub mod keys;
pub mod store;

pub use client::{S3Config, S3Store};
pub use error::{StorageError, StorageResult};
pub use keys::{artifact_key, image_key};
pub use store::ObjectStore;
