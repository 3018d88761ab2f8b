//! Axum API server binary.
//!
//! Wires the whole service in one process: object store client, job store,
//! queue, background consumer and HTTP server. The consumer is constructed
//! and shut down explicitly rather than living as a module-level singleton.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pixpress_api::{create_router, ApiConfig, AppState};
use pixpress_jobs::{JobStore, MemoryJobStore};
use pixpress_queue::JobQueue;
use pixpress_storage::{ObjectStore, S3Store};
use pixpress_worker::{BatchPipeline, ItemTranscoder, QueueConsumer, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("pixpress=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting pixpress-api");

    let config = ApiConfig::from_env();
    let worker_config = WorkerConfig::from_env();
    info!("API config: host={}, port={}", config.host, config.port);

    let storage: Arc<dyn ObjectStore> = match S3Store::from_env() {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to create storage client: {}", e);
            std::process::exit(1);
        }
    };

    let jobs: Arc<dyn JobStore> = MemoryJobStore::shared();
    let (queue, receiver) = JobQueue::new();

    let item = match ItemTranscoder::new(&worker_config, Arc::clone(&storage)) {
        Ok(i) => i,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let pipeline = BatchPipeline::new(&worker_config, Arc::clone(&jobs), storage, item);
    let (consumer, consumer_shutdown) = QueueConsumer::new(receiver, pipeline);
    let consumer_task = tokio::spawn(consumer.run());

    let state = AppState::new(config.clone(), jobs, queue);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // Stop the consumer after its in-flight job; queued jobs are dropped,
    // their records stay pending.
    consumer_shutdown.signal();
    consumer_task.await.ok();

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
