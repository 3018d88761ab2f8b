//! Job records and lifecycle status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a batch processing job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

/// Error returned when a status lookup id is not a well-formed job id.
#[derive(Debug, Error)]
#[error("invalid job id: {0}")]
pub struct InvalidJobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an externally supplied id, rejecting anything that is not a
    /// UUID. Status lookups validate before touching the store.
    pub fn parse(s: &str) -> Result<Self, InvalidJobId> {
        Uuid::parse_str(s)
            .map(|u| Self(u.to_string()))
            .map_err(|_| InvalidJobId(s.to_string()))
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Batch job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is recorded and waiting for the consumer
    #[default]
    Pending,
    /// Job is actively being processed
    Processing,
    /// Pipeline ran to completion and the artifact was published
    Completed,
    /// A pipeline-scoped step failed
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    ///
    /// Transitions are one-directional: `pending -> processing ->
    /// {completed|failed}`. A job that never reached the consumer may also
    /// go `pending -> failed`. Terminal states never exit.
    pub fn can_transition(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Pending, JobStatus::Failed)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected status transition.
#[derive(Debug, Clone, Copy, Error)]
#[error("illegal status transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Persisted lifecycle state for one submitted batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique job identifier
    pub id: JobId,
    /// Current lifecycle status
    pub status: JobStatus,
    /// Published artifact URL, set only on completion
    pub output_csv_url: Option<String>,
    /// Failure reason, set only when the job fails
    pub error: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new pending record with a fresh id.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            output_csv_url: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move to `next`, bumping `updated_at`. Rejects regressions and any
    /// transition out of a terminal state.
    pub fn transition(&mut self, next: JobStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark the job completed, recording the published artifact URL.
    pub fn complete(&mut self, output_csv_url: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Completed)?;
        self.output_csv_url = Some(output_csv_url.into());
        Ok(())
    }

    /// Mark the job failed with a reason.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }
}

impl Default for JobRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_pending() {
        let record = JobRecord::new();
        assert_eq!(record.status, JobStatus::Pending);
        assert!(record.output_csv_url.is_none());
        assert!(!record.is_terminal());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut record = JobRecord::new();

        record.transition(JobStatus::Processing).unwrap();
        assert_eq!(record.status, JobStatus::Processing);

        record.complete("https://store.example/csv_outputs/out.csv").unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert!(record.output_csv_url.is_some());
        assert!(record.is_terminal());
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let mut record = JobRecord::new();
        record.transition(JobStatus::Processing).unwrap();
        record.fail("publish failed").unwrap();

        assert!(record.transition(JobStatus::Pending).is_err());
        assert!(record.transition(JobStatus::Processing).is_err());
        assert!(record.complete("u").is_err());
        assert_eq!(record.status, JobStatus::Failed);
    }

    #[test]
    fn test_no_regression() {
        let mut record = JobRecord::new();
        record.transition(JobStatus::Processing).unwrap();
        assert!(record.transition(JobStatus::Pending).is_err());
        // A job cannot complete without having been processed.
        let mut fresh = JobRecord::new();
        assert!(fresh.transition(JobStatus::Completed).is_err());
    }

    #[test]
    fn test_job_id_parse() {
        let id = JobId::new();
        assert!(JobId::parse(id.as_str()).is_ok());
        assert!(JobId::parse("not-a-uuid").is_err());
        assert!(JobId::parse("").is_err());
    }
}
