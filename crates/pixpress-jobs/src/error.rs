//! Job store error types.

use pixpress_models::{JobId, TransitionError};
use thiserror::Error;

/// Result type for job store operations.
pub type JobStoreResult<T> = Result<T, JobStoreError>;

/// Errors that can occur reading or mutating job records.
#[derive(Debug, Error)]
pub enum JobStoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

impl JobStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, JobStoreError::NotFound(_))
    }
}
