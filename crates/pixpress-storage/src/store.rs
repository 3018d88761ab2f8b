//! Object store capability.

use std::path::Path;

use async_trait::async_trait;

use crate::error::StorageResult;

/// Publish capability: durably store bytes under a key, tagged with a
/// content type, and return the public URL of the stored object.
///
/// Implementations must be safe to call concurrently; the pipeline fans
/// out across rows with a shared handle.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an in-memory buffer.
    async fn put_bytes(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Store a local file by streaming it from disk.
    async fn put_file(
        &self,
        path: &Path,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String>;
}
