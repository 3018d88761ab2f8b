//! HTTP surface tests against an in-memory backend (no consumer running,
//! so accepted jobs stay pending).

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::util::ServiceExt;

use pixpress_api::{create_router, ApiConfig, AppState};
use pixpress_jobs::{JobStore, MemoryJobStore};
use pixpress_queue::{JobQueue, JobReceiver};

const VALID_CSV: &str = "S. No.,Product Name,Input Image Urls\n\
                         1,Widget,http://images.example/1.png\n";

fn test_app() -> (Router, JobReceiver) {
    let jobs: Arc<dyn JobStore> = MemoryJobStore::shared();
    let (queue, receiver) = JobQueue::new();
    let state = AppState::new(ApiConfig::default(), jobs, queue);
    (create_router(state), receiver)
}

fn multipart_upload(field_name: &str, csv: &str) -> Request<Body> {
    let boundary = "pixpress-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"batch.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {csv}\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/upload-csv")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (app, _rx) = test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let (app, _rx) = test_app();
    let response = app
        .oneshot(multipart_upload("somethingElse", VALID_CSV))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["detail"], "Bad request: No CSV file uploaded");
}

#[tokio::test]
async fn upload_invalid_csv_is_rejected_with_details() {
    let (app, _rx) = test_app();
    let bad_csv = "S. No.,Product Name,Input Image Urls\nx,,\n";
    let response = app
        .oneshot(multipart_upload("csvFile", bad_csv))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);
}

#[tokio::test]
async fn upload_is_acknowledged_and_job_stays_pending() {
    let (app, mut rx) = test_app();

    let response = app
        .clone()
        .oneshot(multipart_upload("csvFile", VALID_CSV))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = json_body(response).await;
    let request_id = body["request_id"].as_str().unwrap().to_string();
    assert!(!request_id.is_empty());

    // The job was queued, not processed inline.
    let queued = rx.recv().await.unwrap();
    assert_eq!(queued.job_id.to_string(), request_id);

    let response = app
        .oneshot(
            Request::get(format!("/status/{request_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["outputCsvUrl"], serde_json::Value::Null);
}

#[tokio::test]
async fn status_with_malformed_id_is_rejected() {
    let (app, _rx) = test_app();
    let response = app
        .oneshot(
            Request::get("/status/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_for_unknown_job_is_not_found() {
    let (app, _rx) = test_app();
    let response = app
        .oneshot(
            Request::get("/status/123e4567-e89b-12d3-a456-426614174000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
