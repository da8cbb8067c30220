//! The storage seam the pipeline depends on.

use async_trait::async_trait;

use subpipe_models::ObjectMetadata;

use crate::error::StorageResult;

/// Read/write access to the blob storage backend.
///
/// The pipeline only needs two operations: a metadata read for the
/// uploaded object and a bytes write for derived thumbnails. Injected
/// into the orchestrator so tests can substitute fakes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch size, content type, custom tags and last-modified for one
    /// object. No retries here; retry bookkeeping belongs to the record
    /// processor.
    async fn head_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata>;

    /// Write a derived artifact (thumbnail) to storage.
    async fn put_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;
}
