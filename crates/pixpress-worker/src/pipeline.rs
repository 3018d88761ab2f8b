//! Batch pipeline: job state machine plus concurrent row fan-out.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info};

use pixpress_jobs::JobStore;
use pixpress_models::{parse_batch, write_batch, JobStatus, OutputRow};
use pixpress_queue::BatchJob;
use pixpress_storage::{artifact_key, ObjectStore};

use crate::config::WorkerConfig;
use crate::error::PipelineError;
use crate::item::ItemTranscoder;
use crate::row::process_row;

/// Runs one queued batch end to end.
///
/// Owns the job record's mutable status for the duration of a run; nothing
/// else writes to it.
pub struct BatchPipeline {
    jobs: Arc<dyn JobStore>,
    storage: Arc<dyn ObjectStore>,
    item: ItemTranscoder,
    row_permits: Arc<Semaphore>,
}

impl BatchPipeline {
    pub fn new(
        config: &WorkerConfig,
        jobs: Arc<dyn JobStore>,
        storage: Arc<dyn ObjectStore>,
        item: ItemTranscoder,
    ) -> Self {
        Self {
            jobs,
            storage,
            item,
            row_permits: Arc::new(Semaphore::new(config.max_concurrent_rows)),
        }
    }

    /// Execute one job, driving its record `processing -> {completed|failed}`.
    ///
    /// Returns the artifact URL on success. The error is also recorded on
    /// the job record; callers only log it, since the submitter already got
    /// its acknowledgment and observes the outcome by polling.
    pub async fn run(&self, job: BatchJob) -> Result<String, PipelineError> {
        let job_id = job.job_id.clone();
        self.jobs
            .update_status(&job_id, JobStatus::Processing, None, None)
            .await?;
        info!(%job_id, "batch job started");

        match self.execute(&job).await {
            Ok(url) => {
                self.jobs
                    .update_status(&job_id, JobStatus::Completed, Some(url.clone()), None)
                    .await?;
                info!(%job_id, artifact = %url, "batch job completed");
                Ok(url)
            }
            Err(e) => {
                error!(%job_id, error = %e, "batch job failed");
                if let Err(store_err) = self
                    .jobs
                    .update_status(&job_id, JobStatus::Failed, None, Some(e.to_string()))
                    .await
                {
                    error!(%job_id, error = %store_err, "could not record job failure");
                }
                Err(e)
            }
        }
    }

    async fn execute(&self, job: &BatchJob) -> Result<String, PipelineError> {
        let rows = parse_batch(&job.csv_bytes).map_err(PipelineError::Parse)?;
        let row_count = rows.len();

        // Fan out across rows; the semaphore bounds how many run at once
        // and join_all is the single join point before publish.
        let outcomes = join_all(rows.into_iter().map(|row| {
            let permits = Arc::clone(&self.row_permits);
            async move {
                let _permit = permits.acquire().await.ok();
                process_row(&self.item, row).await
            }
        }))
        .await;

        let item_failures: usize = outcomes.iter().map(|o| o.failures.len()).sum();
        let augmented: Vec<OutputRow> = outcomes.into_iter().map(|o| o.row).collect();
        info!(
            job_id = %job.job_id,
            rows = row_count,
            item_failures,
            "all rows resolved, publishing artifact"
        );

        let csv = write_batch(&augmented).map_err(PipelineError::Serialize)?;
        let key = artifact_key(job.job_id.as_str());
        self.storage
            .put_bytes(&key, csv, "text/csv")
            .await
            .map_err(PipelineError::Publish)
    }
}
