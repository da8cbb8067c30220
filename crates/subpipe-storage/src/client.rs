//! S3 client implementation.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use tracing::debug;

use subpipe_models::ObjectMetadata;

use crate::error::{StorageError, StorageResult};
use crate::object_store::ObjectStore;

/// S3-backed object store.
///
/// Custom submission tags ride on the object as user metadata
/// (`x-amz-meta-*`), so a single `HeadObject` call yields everything the
/// validator needs.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Wrap an already-configured SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create from the ambient AWS environment (credentials chain, region).
    pub async fn from_env() -> StorageResult<Self> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        debug!(bucket, key, "Fetching object metadata");

        let response = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::metadata_fetch(key, e.to_string()))?;

        let size_bytes = response.content_length().and_then(|n| u64::try_from(n).ok());
        let content_type = response.content_type().map(str::to_string);
        let custom_tags = response.metadata().cloned();
        let last_modified = response
            .last_modified()
            .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()));

        Ok(ObjectMetadata::new(
            size_bytes,
            content_type,
            custom_tags,
            last_modified,
        ))
    }

    async fn put_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        debug!(bucket, key, bytes = data.len(), "Uploading object");

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        Ok(())
    }
}
