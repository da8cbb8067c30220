//! Derived artifact generation.
//!
//! Produces thumbnails and media metadata for one accepted upload.
//! Thumbnail and probe failures are absorbed here: the generator always
//! hands back a result, and a thumbnail outage costs only the thumbnail
//! list, never the record.

use std::sync::Arc;
use std::time::Instant;

use metrics::counter;
use tracing::{debug, warn};

use subpipe_media::MediaProbe;
use subpipe_models::{ObjectMetadata, ProcessingResults, SubmissionKey};
use subpipe_storage::ObjectStore;

use crate::error::PipelineResult;

const MIB: u64 = 1024 * 1024;

/// Source bytes covered by each thumbnail.
const BYTES_PER_THUMBNAIL: u64 = 50 * MIB;

/// Maximum thumbnails per submission.
const MAX_THUMBNAILS: u64 = 5;

/// Generates thumbnails, duration and resolution for accepted uploads.
pub struct ArtifactGenerator {
    probe: Arc<dyn MediaProbe>,
    objects: Arc<dyn ObjectStore>,
    thumbnail_bucket: String,
    interval_secs: u32,
}

impl ArtifactGenerator {
    pub fn new(
        probe: Arc<dyn MediaProbe>,
        objects: Arc<dyn ObjectStore>,
        thumbnail_bucket: impl Into<String>,
        interval_secs: u32,
    ) -> Self {
        Self {
            probe,
            objects,
            thumbnail_bucket: thumbnail_bucket.into(),
            interval_secs,
        }
    }

    /// How many thumbnails a source of this size gets.
    pub fn thumbnail_count(size_bytes: u64) -> u64 {
        size_bytes.div_ceil(BYTES_PER_THUMBNAIL).clamp(1, MAX_THUMBNAILS)
    }

    /// Thumbnail object key for one frame offset.
    pub fn thumbnail_key(key: &SubmissionKey, offset_seconds: u32) -> String {
        format!(
            "thumbnails/{}/{}/thumb_{}s.jpg",
            key.assignment_id, key.user_id, offset_seconds
        )
    }

    /// Derive all artifacts for one accepted upload.
    ///
    /// Never fails outright. Probe and thumbnail errors degrade the
    /// result (missing duration/resolution, empty thumbnail list) and
    /// are logged through a single adapter at the failure site.
    pub async fn generate(
        &self,
        source_bucket: &str,
        object_key: &str,
        metadata: &ObjectMetadata,
        key: &SubmissionKey,
    ) -> ProcessingResults {
        let started = Instant::now();

        let media_info = match self
            .probe
            .probe(source_bucket, object_key, metadata.size_bytes)
            .await
        {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(submission = %key, error = %e, "Media probe failed; duration/resolution omitted");
                None
            }
        };

        let thumbnail_urls = match self
            .upload_thumbnails(source_bucket, object_key, metadata.size_bytes, key)
            .await
        {
            Ok(urls) => urls,
            Err(e) => {
                counter!("pipeline_thumbnail_failures_total").increment(1);
                warn!(submission = %key, error = %e, "Thumbnail generation failed; continuing without thumbnails");
                Vec::new()
            }
        };

        ProcessingResults {
            thumbnail_urls,
            video_duration_seconds: media_info.map(|i| i.duration_seconds),
            video_resolution: media_info.map(|i| i.resolution),
            processing_duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    async fn upload_thumbnails(
        &self,
        source_bucket: &str,
        object_key: &str,
        size_bytes: u64,
        key: &SubmissionKey,
    ) -> PipelineResult<Vec<String>> {
        let count = Self::thumbnail_count(size_bytes);
        let mut urls = Vec::with_capacity(count as usize);

        for index in 0..count {
            let offset_seconds = (index as u32 + 1) * self.interval_secs;
            let frame = self
                .probe
                .render_thumbnail(source_bucket, object_key, offset_seconds)
                .await?;

            let thumb_key = Self::thumbnail_key(key, offset_seconds);
            self.objects
                .put_bytes(&self.thumbnail_bucket, &thumb_key, frame, "image/jpeg")
                .await?;
            urls.push(thumb_key);
        }

        debug!(submission = %key, thumbnails = urls.len(), "Thumbnails uploaded");
        Ok(urls)
    }
}
