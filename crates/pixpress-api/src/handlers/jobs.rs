//! Batch submission and status handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use pixpress_jobs::JobStore;
use pixpress_models::{JobId, JobStatus};
use pixpress_queue::BatchJob;

use crate::csv_gate;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field the batch file is expected under.
const CSV_FIELD_NAME: &str = "csvFile";

/// Upload acknowledgment.
#[derive(Serialize)]
pub struct UploadResponse {
    pub request_id: String,
    pub message: String,
}

/// Status poll response.
#[derive(Serialize)]
pub struct StatusResponse {
    pub request_id: String,
    pub status: String,
    #[serde(rename = "outputCsvUrl")]
    pub output_csv_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Accept a batch CSV, validate it, and enqueue it for processing.
///
/// Returns as soon as the job is recorded; processing happens on the
/// background consumer and is observed via `GET /status/:id`.
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let mut csv_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some(CSV_FIELD_NAME) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
            csv_bytes = Some(bytes.to_vec());
            break;
        }
    }

    let Some(csv_bytes) = csv_bytes else {
        return Err(ApiError::bad_request("No CSV file uploaded"));
    };

    csv_gate::validate_batch(&csv_bytes)?;

    let record = state.jobs.create().await;
    let job_id = record.id.clone();

    if let Err(e) = state.queue.enqueue(BatchJob::new(job_id.clone(), csv_bytes)) {
        error!(%job_id, error = %e, "enqueue failed after record creation");
        // The record exists but can never run; fail it so polling reflects
        // reality.
        if let Err(store_err) = state
            .jobs
            .update_status(&job_id, JobStatus::Failed, None, Some(e.to_string()))
            .await
        {
            error!(%job_id, error = %store_err, "could not record enqueue failure");
        }
        return Err(ApiError::internal("Job could not be queued"));
    }

    info!(%job_id, "batch accepted");
    Ok((
        StatusCode::ACCEPTED,
        Json(UploadResponse {
            request_id: job_id.to_string(),
            message: "CSV accepted for processing".to_string(),
        }),
    ))
}

/// Poll a job's lifecycle status.
pub async fn job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let job_id = JobId::parse(&id).map_err(|_| ApiError::bad_request("Invalid request ID"))?;

    let record = state
        .jobs
        .get(&job_id)
        .await
        .map_err(|_| ApiError::not_found("Request not found"))?;

    Ok(Json(StatusResponse {
        request_id: record.id.to_string(),
        status: record.status.to_string(),
        output_csv_url: record.output_csv_url,
        error: record.error,
    }))
}
