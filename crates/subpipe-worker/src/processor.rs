//! Per-record processing and the submission state machine.
//!
//! Drives one notification record through
//! `processing -> completed | failed`. Skips never touch the record
//! store. Validation rejections mark the submission `failed` without a
//! retry increment; transient stage failures (metadata fetch, artifact
//! generation) mark it `failed` and bump the retry count so external
//! re-delivery can try again.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, warn};

use subpipe_models::{
    NotificationRecord, ProcessingResults, RecordOutcome, SkipReason, SubmissionKey,
    SubmissionStatus,
};
use subpipe_storage::ObjectStore;
use subpipe_store::SubmissionStore;

use crate::artifacts::ArtifactGenerator;
use crate::config::PipelineConfig;
use crate::validator::{validate_upload, ValidationOutcome};

/// Processes one notification record end to end.
pub struct RecordProcessor {
    config: PipelineConfig,
    objects: Arc<dyn ObjectStore>,
    store: Arc<dyn SubmissionStore>,
    artifacts: ArtifactGenerator,
}

impl RecordProcessor {
    pub fn new(
        config: PipelineConfig,
        objects: Arc<dyn ObjectStore>,
        store: Arc<dyn SubmissionStore>,
        artifacts: ArtifactGenerator,
    ) -> Self {
        Self {
            config,
            objects,
            store,
            artifacts,
        }
    }

    /// Process one record, returning an explicit outcome.
    ///
    /// Never fails: every error inside the record boundary is converted
    /// into a skip, a terminal status write, or a swallowed log line.
    pub async fn process(&self, record: &NotificationRecord) -> RecordOutcome {
        if let Some(reason) = self.skip_reason(record) {
            debug!(
                event = %record.event_name,
                bucket = %record.bucket_name,
                key = %record.object_key,
                %reason,
                "Skipping record"
            );
            counter!("pipeline_records_total", "outcome" => "skipped").increment(1);
            return RecordOutcome::Skipped { reason };
        }

        // Skip checks passed, so the key is parseable.
        let key = match SubmissionKey::parse(&record.object_key) {
            Some(key) => key,
            None => {
                return RecordOutcome::Skipped {
                    reason: SkipReason::UnrecognizedKey,
                }
            }
        };

        info!(submission = %key, file = %key.file_name, "Processing submission upload");

        let metadata = match self
            .objects
            .head_metadata(&record.bucket_name, &record.object_key)
            .await
        {
            Ok(metadata) => metadata,
            Err(e) => {
                let error = e.to_string();
                self.write_status(&key, SubmissionStatus::Failed, Some(&error))
                    .await;
                self.bump_retry(&key).await;
                counter!("pipeline_records_total", "outcome" => "failed").increment(1);
                return RecordOutcome::Failed { key, error };
            }
        };

        if let ValidationOutcome::Rejected(reason) = validate_upload(&metadata) {
            info!(submission = %key, %reason, "Upload rejected by validation");
            // Deterministic policy violation: no retry increment.
            self.write_status(&key, SubmissionStatus::Failed, Some(&reason))
                .await;
            counter!("pipeline_records_total", "outcome" => "rejected").increment(1);
            return RecordOutcome::Rejected { key, reason };
        }

        self.write_status(&key, SubmissionStatus::Processing, None)
            .await;

        let results = self
            .artifacts
            .generate(&record.bucket_name, &record.object_key, &metadata, &key)
            .await;

        self.write_results(&key, &results).await;
        self.write_status(&key, SubmissionStatus::Completed, None)
            .await;

        info!(
            submission = %key,
            thumbnails = results.thumbnail_urls.len(),
            duration_ms = results.processing_duration_ms,
            "Submission processed"
        );
        counter!("pipeline_records_total", "outcome" => "completed").increment(1);
        RecordOutcome::Completed { key, results }
    }

    fn skip_reason(&self, record: &NotificationRecord) -> Option<SkipReason> {
        if !record.is_upload_completion() {
            return Some(SkipReason::IgnoredEventType);
        }
        if record.bucket_name != self.config.media_bucket {
            return Some(SkipReason::ForeignBucket);
        }
        if SubmissionKey::parse(&record.object_key).is_none() {
            return Some(SkipReason::UnrecognizedKey);
        }
        None
    }

    // Record-store writes are best-effort bookkeeping: losing a status
    // update is preferable to losing a processed artifact or the batch.

    async fn write_status(
        &self,
        key: &SubmissionKey,
        status: SubmissionStatus,
        error_message: Option<&str>,
    ) {
        if let Err(e) = self.store.set_status(key, status, error_message).await {
            warn!(submission = %key, %status, error = %e, "Status write failed; continuing");
        }
    }

    async fn write_results(&self, key: &SubmissionKey, results: &ProcessingResults) {
        if let Err(e) = self.store.set_results(key, results).await {
            warn!(submission = %key, error = %e, "Results write failed; continuing");
        }
    }

    async fn bump_retry(&self, key: &SubmissionKey) {
        if let Err(e) = self.store.increment_retry_count(key).await {
            warn!(submission = %key, error = %e, "Retry-count write failed; continuing");
        }
    }
}
