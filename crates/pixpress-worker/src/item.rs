//! Item transcoder: fetch one remote image, transform it, publish it.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use pixpress_media::{extension_for, Transcoder};
use pixpress_storage::{image_key, ObjectStore};

use crate::config::WorkerConfig;
use crate::error::ItemError;

/// Processes a single source reference end to end.
///
/// Pure with respect to the job record: every failure is returned to the
/// caller, which owns the isolation policy.
pub struct ItemTranscoder {
    http: reqwest::Client,
    transcoder: Transcoder,
    storage: Arc<dyn ObjectStore>,
}

impl ItemTranscoder {
    pub fn new(
        config: &WorkerConfig,
        storage: Arc<dyn ObjectStore>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;
        Ok(Self {
            http,
            transcoder: Transcoder::new(config.target_width, config.jpeg_quality),
            storage,
        })
    }

    /// Fetch, transcode and publish one reference, returning the published
    /// URL.
    ///
    /// The transformed bytes are spooled to a temp file between transform
    /// and publish; the file is removed on every exit path when the guard
    /// drops.
    pub async fn process(&self, reference: &str) -> Result<String, ItemError> {
        let response = self
            .http
            .get(reference)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ItemError::Fetch(e.to_string()))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let extension = extension_for(content_type.as_deref());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ItemError::Fetch(e.to_string()))?;

        debug!(reference, size = bytes.len(), extension, "fetched source image");

        let transcoder = self.transcoder.clone();
        let transformed = tokio::task::spawn_blocking(move || transcoder.transcode(&bytes))
            .await
            .map_err(|e| ItemError::Transform(format!("transform task aborted: {e}")))?
            .map_err(|e| ItemError::Transform(e.to_string()))?;

        let spool = tempfile::NamedTempFile::new()
            .map_err(|e| ItemError::Publish(e.to_string()))?;
        tokio::fs::write(spool.path(), &transformed)
            .await
            .map_err(|e| ItemError::Publish(e.to_string()))?;
        drop(transformed);

        let key = image_key(reference, extension);
        let url = self
            .storage
            .put_file(spool.path(), &key, "image/jpeg")
            .await
            .map_err(|e| ItemError::Publish(e.to_string()))?;

        debug!(reference, url, "published transcoded image");
        Ok(url)
    }
}
