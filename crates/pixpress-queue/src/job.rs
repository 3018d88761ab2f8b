//! Queued job payload.

use serde::{Deserialize, Serialize};

use pixpress_models::JobId;

/// One submitted batch, queued for the consumer.
///
/// Carries the raw CSV bytes: parsing happens inside the pipeline so that a
/// malformed file fails the job rather than the submission path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub job_id: JobId,
    pub csv_bytes: Vec<u8>,
}

impl BatchJob {
    pub fn new(job_id: JobId, csv_bytes: Vec<u8>) -> Self {
        Self { job_id, csv_bytes }
    }
}
