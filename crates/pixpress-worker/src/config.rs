//! Worker configuration.

use std::time::Duration;

use pixpress_media::{DEFAULT_JPEG_QUALITY, DEFAULT_TARGET_WIDTH};

/// Pipeline tunables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Upper bound on rows processed concurrently within one job
    pub max_concurrent_rows: usize,
    /// Timeout applied to each image fetch
    pub fetch_timeout: Duration,
    /// Width transcoded images are scaled to
    pub target_width: u32,
    /// JPEG quality transcoded images are recompressed at
    pub jpeg_quality: u8,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_rows: 8,
            fetch_timeout: Duration::from_secs(10),
            target_width: DEFAULT_TARGET_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_concurrent_rows: std::env::var("WORKER_MAX_CONCURRENT_ROWS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.max_concurrent_rows),
            fetch_timeout: Duration::from_secs(
                std::env::var("WORKER_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.fetch_timeout.as_secs()),
            ),
            target_width: std::env::var("WORKER_TARGET_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.target_width),
            jpeg_quality: std::env::var("WORKER_JPEG_QUALITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jpeg_quality),
        }
    }
}
