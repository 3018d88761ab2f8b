//! Application state.

use std::sync::Arc;

use pixpress_jobs::JobStore;
use pixpress_queue::JobQueue;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub jobs: Arc<dyn JobStore>,
    pub queue: JobQueue,
}

impl AppState {
    pub fn new(config: ApiConfig, jobs: Arc<dyn JobStore>, queue: JobQueue) -> Self {
        Self {
            config,
            jobs,
            queue,
        }
    }
}
