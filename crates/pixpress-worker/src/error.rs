//! Worker error types.
//!
//! Two scopes: `ItemError` for one reference (absorbed at the row
//! boundary), `PipelineError` for the batch as a whole (fatal to the job).

use serde::Serialize;
use thiserror::Error;

use pixpress_jobs::JobStoreError;
use pixpress_models::BatchCsvError;
use pixpress_storage::StorageError;

/// Failure of a single item. Never escapes the row processor.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("transform failed: {0}")]
    Transform(String),

    #[error("publish failed: {0}")]
    Publish(String),
}

impl ItemError {
    pub fn kind(&self) -> ItemFailureKind {
        match self {
            ItemError::Fetch(_) => ItemFailureKind::Fetch,
            ItemError::Transform(_) => ItemFailureKind::Transform,
            ItemError::Publish(_) => ItemFailureKind::Publish,
        }
    }

    fn message(&self) -> String {
        match self {
            ItemError::Fetch(m) | ItemError::Transform(m) | ItemError::Publish(m) => m.clone(),
        }
    }
}

/// Which step of item processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFailureKind {
    Fetch,
    Transform,
    Publish,
}

/// Structured record of one absorbed item failure, kept on the row outcome
/// so callers and tests can see why an output reference is missing.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub reference: String,
    pub kind: ItemFailureKind,
    pub message: String,
}

impl ItemFailure {
    pub fn new(reference: impl Into<String>, error: &ItemError) -> Self {
        Self {
            reference: reference.into(),
            kind: error.kind(),
            message: error.message(),
        }
    }
}

/// Batch-scoped failure. Transitions the job to `failed`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("batch parse failed: {0}")]
    Parse(BatchCsvError),

    #[error("artifact serialization failed: {0}")]
    Serialize(BatchCsvError),

    #[error("artifact publish failed: {0}")]
    Publish(StorageError),

    #[error("job store error: {0}")]
    JobStore(#[from] JobStoreError),
}
