//! Batch orchestration.
//!
//! Fans one notification batch out to concurrent record tasks. Only a
//! structurally invalid batch fails the invocation; every per-record
//! problem is isolated at the task boundary so one bad record cannot
//! abort its siblings.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use subpipe_media::MediaProbe;
use subpipe_models::{NotificationBatch, RecordOutcome};
use subpipe_storage::ObjectStore;
use subpipe_store::SubmissionStore;

use crate::artifacts::ArtifactGenerator;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::processor::RecordProcessor;

/// Outcome counts for one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub skipped: usize,
    pub rejected: usize,
    pub completed: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Tally outcomes from a settled batch.
    pub fn from_outcomes(outcomes: &[RecordOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                RecordOutcome::Skipped { .. } => summary.skipped += 1,
                RecordOutcome::Rejected { .. } => summary.rejected += 1,
                RecordOutcome::Completed { .. } => summary.completed += 1,
                RecordOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.skipped + self.rejected + self.completed + self.failed
    }
}

/// Fans batches out to the record processor.
///
/// All collaborators are injected so tests can substitute fakes for the
/// storage backend, the record store and the media capability.
pub struct BatchOrchestrator {
    processor: Arc<RecordProcessor>,
    max_concurrent: usize,
}

impl BatchOrchestrator {
    pub fn new(
        config: PipelineConfig,
        objects: Arc<dyn ObjectStore>,
        store: Arc<dyn SubmissionStore>,
        probe: Arc<dyn MediaProbe>,
    ) -> Self {
        let max_concurrent = config.max_concurrent_records.max(1);
        let artifacts = ArtifactGenerator::new(
            probe,
            Arc::clone(&objects),
            config.thumbnail_bucket.clone(),
            config.thumbnail_interval_secs,
        );
        let processor = Arc::new(RecordProcessor::new(config, objects, store, artifacts));

        Self {
            processor,
            max_concurrent,
        }
    }

    /// Parse the inbound payload into a batch.
    ///
    /// A payload that does not match the schema fails the whole
    /// invocation with [`PipelineError::InvalidBatchFormat`]; nothing is
    /// processed.
    pub fn parse_batch(payload: &str) -> PipelineResult<NotificationBatch> {
        serde_json::from_str(payload).map_err(|e| PipelineError::invalid_batch(e.to_string()))
    }

    /// Parse and process one payload.
    pub async fn run(&self, payload: &str) -> PipelineResult<Vec<RecordOutcome>> {
        let batch = Self::parse_batch(payload)?;
        Ok(self.process(batch).await)
    }

    /// Process one batch, returning per-record outcomes once every task
    /// has settled. Individual failures never abort siblings; a panicked
    /// task is logged and dropped from the outcome list.
    pub async fn process(&self, batch: NotificationBatch) -> Vec<RecordOutcome> {
        let record_count = batch.records.len();
        info!(records = record_count, "Processing notification batch");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(record_count);

        for record in batch.records {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed while we hold it.
                Err(_) => break,
            };
            let processor = Arc::clone(&self.processor);

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                processor.process(&record).await
            }));
        }

        let mut outcomes = Vec::with_capacity(record_count);
        for result in futures::future::join_all(handles).await {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!(error = %e, "Record task panicked; continuing with siblings");
                }
            }
        }

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            completed = summary.completed,
            rejected = summary.rejected,
            failed = summary.failed,
            skipped = summary.skipped,
            "Batch settled"
        );
        outcomes
    }
}
