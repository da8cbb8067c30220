//! The record-store seam the pipeline depends on.

use async_trait::async_trait;

use subpipe_models::{ProcessingResults, SubmissionKey, SubmissionStatus};

use crate::error::StoreResult;

/// Writes against one submission record, keyed by `(assignment_id, user_id)`.
///
/// The pipeline is the sole writer of these fields. Every operation is an
/// idempotent overwrite except [`increment_retry_count`], which is an
/// atomic increment. Callers treat all three as best-effort: a failed
/// write is logged and swallowed, never propagated.
///
/// [`increment_retry_count`]: SubmissionStore::increment_retry_count
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Set the status and `updated_at`. Sets `error_message` when given,
    /// and stamps `processed_at` when the status is terminal.
    async fn set_status(
        &self,
        key: &SubmissionKey,
        status: SubmissionStatus,
        error_message: Option<&str>,
    ) -> StoreResult<()>;

    /// Persist derived-artifact results: `thumbnail_urls`,
    /// `processing_duration_ms`, and duration/resolution when present.
    async fn set_results(&self, key: &SubmissionKey, results: &ProcessingResults)
        -> StoreResult<()>;

    /// Atomically increment `retry_count` by one.
    async fn increment_retry_count(&self, key: &SubmissionKey) -> StoreResult<()>;
}
