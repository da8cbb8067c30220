//! End-to-end pipeline tests against fake collaborators.
//!
//! Exercises the batch orchestrator and record processor with in-memory
//! implementations of the storage, record-store and media seams.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use subpipe_media::SimulatedMediaProbe;
use subpipe_models::notification::{EVENT_MULTIPART_COMPLETED, EVENT_OBJECT_PUT};
use subpipe_models::{
    NotificationBatch, NotificationRecord, ObjectMetadata, ProcessingResults, RecordOutcome,
    SkipReason, SubmissionKey, SubmissionStatus,
};
use subpipe_storage::{ObjectStore, StorageError, StorageResult};
use subpipe_store::{StoreError, StoreResult, SubmissionStore};
use subpipe_worker::validator::REQUIRED_TAGS;
use subpipe_worker::{BatchOrchestrator, PipelineConfig, PipelineError};

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct FakeObjectStore {
    metadata: Mutex<HashMap<String, ObjectMetadata>>,
    fail_keys: Mutex<HashSet<String>>,
    head_calls: AtomicUsize,
    puts: Mutex<Vec<(String, String)>>,
}

impl FakeObjectStore {
    fn with_object(self, key: &str, metadata: ObjectMetadata) -> Self {
        self.metadata.lock().unwrap().insert(key.to_string(), metadata);
        self
    }

    fn failing_on(self, key: &str) -> Self {
        self.fail_keys.lock().unwrap().insert(key.to_string());
        self
    }

    fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    fn put_keys(&self) -> Vec<(String, String)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn head_metadata(&self, _bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_keys.lock().unwrap().contains(key) {
            return Err(StorageError::metadata_fetch(key, "connection reset"));
        }
        self.metadata
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn put_bytes(
        &self,
        bucket: &str,
        key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        self.puts
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum StoreEvent {
    Status(SubmissionKey, SubmissionStatus, Option<String>),
    Results(SubmissionKey, ProcessingResults),
    Retry(SubmissionKey),
}

#[derive(Default)]
struct FakeSubmissionStore {
    events: Mutex<Vec<StoreEvent>>,
    fail_writes: bool,
}

impl FakeSubmissionStore {
    fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().unwrap().clone()
    }

    fn retry_count(&self, key: &SubmissionKey) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, StoreEvent::Retry(k) if k == key))
            .count()
    }

    fn statuses(&self) -> Vec<(SubmissionStatus, Option<String>)> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                StoreEvent::Status(_, status, message) => Some((*status, message.clone())),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SubmissionStore for FakeSubmissionStore {
    async fn set_status(
        &self,
        key: &SubmissionKey,
        status: SubmissionStatus,
        error_message: Option<&str>,
    ) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::update_failed("simulated outage"));
        }
        self.events.lock().unwrap().push(StoreEvent::Status(
            key.clone(),
            status,
            error_message.map(str::to_string),
        ));
        Ok(())
    }

    async fn set_results(
        &self,
        key: &SubmissionKey,
        results: &ProcessingResults,
    ) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::update_failed("simulated outage"));
        }
        self.events
            .lock()
            .unwrap()
            .push(StoreEvent::Results(key.clone(), results.clone()));
        Ok(())
    }

    async fn increment_retry_count(&self, key: &SubmissionKey) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::update_failed("simulated outage"));
        }
        self.events
            .lock()
            .unwrap()
            .push(StoreEvent::Retry(key.clone()));
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

const MEDIA_BUCKET: &str = "demo-project-videos";
const VALID_KEY: &str = "CS101/assignment123/user123/1704067200000_test-video.mp4";

fn orchestrator(
    objects: Arc<FakeObjectStore>,
    store: Arc<FakeSubmissionStore>,
) -> BatchOrchestrator {
    BatchOrchestrator::new(
        PipelineConfig::default(),
        objects,
        store,
        Arc::new(SimulatedMediaProbe),
    )
}

fn upload_record(object_key: &str) -> NotificationRecord {
    NotificationRecord {
        event_name: EVENT_OBJECT_PUT.to_string(),
        bucket_name: MEDIA_BUCKET.to_string(),
        object_key: object_key.to_string(),
    }
}

fn batch_of(records: Vec<NotificationRecord>) -> NotificationBatch {
    NotificationBatch { records }
}

fn valid_metadata(size_bytes: u64, content_type: &str) -> ObjectMetadata {
    let tags: HashMap<String, String> = REQUIRED_TAGS
        .iter()
        .map(|t| (t.to_string(), "value".to_string()))
        .collect();
    ObjectMetadata::new(
        Some(size_bytes),
        Some(content_type.to_string()),
        Some(tags),
        None,
    )
}

fn submission_key() -> SubmissionKey {
    SubmissionKey::parse(VALID_KEY).unwrap()
}

// =============================================================================
// Skip semantics
// =============================================================================

#[tokio::test]
async fn non_completion_event_never_fetches_metadata() {
    let objects = Arc::new(FakeObjectStore::default());
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(Arc::clone(&objects), Arc::clone(&store));

    let mut record = upload_record(VALID_KEY);
    record.event_name = "ObjectRemoved:Delete".to_string();
    let outcomes = orch.process(batch_of(vec![record])).await;

    assert!(matches!(
        outcomes[0],
        RecordOutcome::Skipped {
            reason: SkipReason::IgnoredEventType
        }
    ));
    assert_eq!(objects.head_calls(), 0);
    assert!(store.events().is_empty());
}

#[tokio::test]
async fn foreign_bucket_never_fetches_metadata() {
    let objects = Arc::new(FakeObjectStore::default());
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(Arc::clone(&objects), Arc::clone(&store));

    let mut record = upload_record(VALID_KEY);
    record.bucket_name = "someone-elses-bucket".to_string();
    let outcomes = orch.process(batch_of(vec![record])).await;

    assert!(matches!(
        outcomes[0],
        RecordOutcome::Skipped {
            reason: SkipReason::ForeignBucket
        }
    ));
    assert_eq!(objects.head_calls(), 0);
}

#[tokio::test]
async fn unrecognized_key_is_skipped_not_failed() {
    let objects = Arc::new(FakeObjectStore::default());
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(Arc::clone(&objects), Arc::clone(&store));

    let outcomes = orch
        .process(batch_of(vec![upload_record("invalid-key-format")]))
        .await;

    assert!(matches!(
        outcomes[0],
        RecordOutcome::Skipped {
            reason: SkipReason::UnrecognizedKey
        }
    ));
    assert_eq!(objects.head_calls(), 0);
    assert!(store.events().is_empty());
}

// =============================================================================
// Validation rejections
// =============================================================================

#[tokio::test]
async fn oversize_upload_fails_without_retry_increment() {
    let objects = Arc::new(
        FakeObjectStore::default()
            .with_object(VALID_KEY, valid_metadata(600 * 1024 * 1024, "video/mp4")),
    );
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(Arc::clone(&objects), Arc::clone(&store));

    let outcomes = orch.process(batch_of(vec![upload_record(VALID_KEY)])).await;

    match &outcomes[0] {
        RecordOutcome::Rejected { key, reason } => {
            assert_eq!(*key, submission_key());
            assert!(reason.contains("exceeds"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    let statuses = store.statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].0, SubmissionStatus::Failed);
    assert!(statuses[0].1.as_deref().unwrap().contains("exceeds"));
    assert_eq!(store.retry_count(&submission_key()), 0);
}

#[tokio::test]
async fn wrong_content_type_is_rejected() {
    let objects = Arc::new(
        FakeObjectStore::default()
            .with_object(VALID_KEY, valid_metadata(1024, "text/plain")),
    );
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(objects, Arc::clone(&store));

    let outcomes = orch.process(batch_of(vec![upload_record(VALID_KEY)])).await;

    assert!(matches!(&outcomes[0], RecordOutcome::Rejected { reason, .. } if reason.contains("text/plain")));
    assert_eq!(store.statuses()[0].0, SubmissionStatus::Failed);
}

#[tokio::test]
async fn missing_course_tag_is_named_in_the_reason() {
    let mut metadata = valid_metadata(1024, "video/mp4");
    metadata.custom_tags.remove("course-id");
    let objects = Arc::new(FakeObjectStore::default().with_object(VALID_KEY, metadata));
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(objects, Arc::clone(&store));

    let outcomes = orch.process(batch_of(vec![upload_record(VALID_KEY)])).await;

    assert!(matches!(&outcomes[0], RecordOutcome::Rejected { reason, .. } if reason.contains("course-id")));
    assert_eq!(store.retry_count(&submission_key()), 0);
}

// =============================================================================
// Successful processing
// =============================================================================

#[tokio::test]
async fn valid_upload_runs_processing_to_completed() {
    let objects = Arc::new(
        FakeObjectStore::default()
            .with_object(VALID_KEY, valid_metadata(10 * 1024 * 1024, "video/mp4")),
    );
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(Arc::clone(&objects), Arc::clone(&store));

    let mut record = upload_record(VALID_KEY);
    record.event_name = EVENT_MULTIPART_COMPLETED.to_string();
    let outcomes = orch.process(batch_of(vec![record])).await;

    let results = match &outcomes[0] {
        RecordOutcome::Completed { key, results } => {
            assert_eq!(*key, submission_key());
            results
        }
        other => panic!("expected completion, got {other:?}"),
    };

    // 10 MiB gets a single thumbnail at the first interval offset.
    assert_eq!(
        results.thumbnail_urls,
        vec!["thumbnails/assignment123/user123/thumb_10s.jpg".to_string()]
    );
    assert!(results.video_duration_seconds.is_some());
    assert_eq!(results.video_resolution.unwrap().width, 1920);

    // processing -> completed, with results persisted in between.
    let events = store.events();
    assert!(matches!(
        &events[0],
        StoreEvent::Status(_, SubmissionStatus::Processing, None)
    ));
    match &events[1] {
        StoreEvent::Results(_, persisted) => {
            assert_eq!(persisted.thumbnail_urls, results.thumbnail_urls);
        }
        other => panic!("expected results write, got {other:?}"),
    }
    assert!(matches!(
        &events[2],
        StoreEvent::Status(_, SubmissionStatus::Completed, None)
    ));

    // Thumbnail landed in the thumbnail bucket.
    let puts = objects.put_keys();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].0, "demo-project-thumbnails");
    assert_eq!(puts[0].1, "thumbnails/assignment123/user123/thumb_10s.jpg");
}

// =============================================================================
// Transient failures
// =============================================================================

#[tokio::test]
async fn metadata_fetch_failure_marks_failed_and_bumps_retry_once() {
    let objects = Arc::new(FakeObjectStore::default().failing_on(VALID_KEY));
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(Arc::clone(&objects), Arc::clone(&store));

    let outcomes = orch.process(batch_of(vec![upload_record(VALID_KEY)])).await;

    match &outcomes[0] {
        RecordOutcome::Failed { key, error } => {
            assert_eq!(*key, submission_key());
            assert!(error.contains("connection reset"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let statuses = store.statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].0, SubmissionStatus::Failed);
    assert_eq!(store.retry_count(&submission_key()), 1);
}

#[tokio::test]
async fn failing_record_does_not_abort_its_sibling() {
    let second_key = "CS101/assignment123/user456/1704067200000_other.mp4";
    let objects = Arc::new(
        FakeObjectStore::default()
            .failing_on(VALID_KEY)
            .with_object(second_key, valid_metadata(1024, "video/mp4")),
    );
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(Arc::clone(&objects), Arc::clone(&store));

    let outcomes = orch
        .process(batch_of(vec![
            upload_record(VALID_KEY),
            upload_record(second_key),
        ]))
        .await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(objects.head_calls(), 2);
    assert!(matches!(outcomes[0], RecordOutcome::Failed { .. }));
    assert!(matches!(outcomes[1], RecordOutcome::Completed { .. }));
}

// =============================================================================
// Batch shape and store outages
// =============================================================================

#[tokio::test]
async fn structurally_invalid_batch_fails_before_any_fetch() {
    let objects = Arc::new(FakeObjectStore::default());
    let store = Arc::new(FakeSubmissionStore::default());
    let orch = orchestrator(Arc::clone(&objects), store);

    let payload = r#"{ "records": [ { "eventName": "ObjectCreated:Put" } ] }"#;
    let result = orch.run(payload).await;

    assert!(matches!(
        result,
        Err(PipelineError::InvalidBatchFormat(_))
    ));
    assert_eq!(objects.head_calls(), 0);
}

#[tokio::test]
async fn record_store_outage_does_not_fail_the_batch() {
    let objects = Arc::new(
        FakeObjectStore::default()
            .with_object(VALID_KEY, valid_metadata(10 * 1024 * 1024, "video/mp4")),
    );
    let store = Arc::new(FakeSubmissionStore::failing());
    let orch = orchestrator(Arc::clone(&objects), store);

    let outcomes = orch.process(batch_of(vec![upload_record(VALID_KEY)])).await;

    // Processing still ran to completion; lost bookkeeping is logged only.
    assert!(matches!(outcomes[0], RecordOutcome::Completed { .. }));
    assert_eq!(objects.put_keys().len(), 1);
}
