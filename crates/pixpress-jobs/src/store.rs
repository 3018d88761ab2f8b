//! Job store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use pixpress_models::{JobId, JobRecord, JobStatus};

use crate::error::{JobStoreError, JobStoreResult};

/// Persistence capability for job records.
///
/// `update_status` enforces the lifecycle invariant: transitions only move
/// forward and terminal states are never left. `output_csv_url` is only
/// meaningful with `Completed`, `error` only with `Failed`; both are
/// ignored otherwise.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a fresh record in `Pending` and return it.
    async fn create(&self) -> JobRecord;

    /// Fetch a record by id.
    async fn get(&self, id: &JobId) -> JobStoreResult<JobRecord>;

    /// Transition a record, updating `updated_at` and the outcome fields.
    async fn update_status(
        &self,
        id: &JobId,
        status: JobStatus,
        output_csv_url: Option<String>,
        error: Option<String>,
    ) -> JobStoreResult<JobRecord>;
}

/// In-memory job store.
///
/// Records live for the process lifetime only, which matches the consumer
/// crash semantics: a job left in `processing` stays there until restart
/// wipes it.
#[derive(Default)]
pub struct MemoryJobStore {
    records: RwLock<HashMap<JobId, JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for wiring into shared state.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self) -> JobRecord {
        let record = JobRecord::new();
        debug!(job_id = %record.id, "created job record");
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        record
    }

    async fn get(&self, id: &JobId) -> JobStoreResult<JobRecord> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| JobStoreError::NotFound(id.clone()))
    }

    async fn update_status(
        &self,
        id: &JobId,
        status: JobStatus,
        output_csv_url: Option<String>,
        error: Option<String>,
    ) -> JobStoreResult<JobRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| JobStoreError::NotFound(id.clone()))?;

        match status {
            JobStatus::Completed => {
                record.complete(output_csv_url.unwrap_or_default())?;
            }
            JobStatus::Failed => {
                record.fail(error.unwrap_or_else(|| "unknown error".to_string()))?;
            }
            other => {
                record.transition(other)?;
            }
        }

        debug!(job_id = %id, status = %record.status, "job status updated");
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryJobStore::new();
        let record = store.create().await;
        let fetched = store.get(&record.id).await.unwrap();
        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let store = MemoryJobStore::new();
        let err = store.get(&JobId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = MemoryJobStore::new();
        let err = store
            .update_status(&JobId::new(), JobStatus::Processing, None, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let store = MemoryJobStore::new();
        let record = store.create().await;

        let updated = store
            .update_status(&record.id, JobStatus::Processing, None, None)
            .await
            .unwrap();
        assert_eq!(updated.status, JobStatus::Processing);
        assert!(updated.updated_at >= record.updated_at);

        let done = store
            .update_status(
                &record.id,
                JobStatus::Completed,
                Some("https://store.example/csv_outputs/out.csv".into()),
                None,
            )
            .await
            .unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(
            done.output_csv_url.as_deref(),
            Some("https://store.example/csv_outputs/out.csv")
        );
    }

    #[tokio::test]
    async fn test_terminal_rejects_further_updates() {
        let store = MemoryJobStore::new();
        let record = store.create().await;
        store
            .update_status(&record.id, JobStatus::Processing, None, None)
            .await
            .unwrap();
        store
            .update_status(&record.id, JobStatus::Failed, None, Some("publish failed".into()))
            .await
            .unwrap();

        let err = store
            .update_status(&record.id, JobStatus::Processing, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, JobStoreError::InvalidTransition(_)));

        // The stored record is untouched by the rejected update.
        let fetched = store.get(&record.id).await.unwrap();
        assert_eq!(fetched.status, JobStatus::Failed);
        assert_eq!(fetched.error.as_deref(), Some("publish failed"));
    }
}
