//! Shared data models for the pixpress backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job records and their lifecycle status
//! - Batch rows (input and augmented output)
//! - CSV parsing and serialization of batch files

pub mod batch;
pub mod csv_io;
pub mod job;

// Re-export common types
pub use batch::{
    join_image_urls, split_image_urls, OutputRow, ProductRow, OUTPUT_URL_SEPARATOR,
};
pub use csv_io::{parse_batch, write_batch, BatchCsvError};
pub use job::{InvalidJobId, JobId, JobRecord, JobStatus, TransitionError};
