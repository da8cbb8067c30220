//! Inbound upload-notification types.
//!
//! One batch is delivered per pipeline invocation. Records are immutable
//! snapshots of the trigger payload; the pipeline never writes them back.

use serde::{Deserialize, Serialize};

/// Event emitted when an object lands via a single PUT.
pub const EVENT_OBJECT_PUT: &str = "ObjectCreated:Put";
/// Event emitted when a multipart upload completes.
pub const EVENT_MULTIPART_COMPLETED: &str = "ObjectCreated:CompleteMultipartUpload";

/// A batch of upload notifications, as delivered by the trigger source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationBatch {
    /// Records in delivery order. Processing order is not guaranteed.
    pub records: Vec<NotificationRecord>,
}

/// A single "object uploaded" notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Event type, e.g. `ObjectCreated:Put`.
    pub event_name: String,
    /// Bucket the object was written to.
    pub bucket_name: String,
    /// Full object key within the bucket.
    pub object_key: String,
}

impl NotificationRecord {
    /// Whether this event marks a completed upload.
    ///
    /// Only completed uploads are actionable; everything else
    /// (deletes, restores, partial events) is skipped, not failed.
    pub fn is_upload_completion(&self) -> bool {
        self.event_name == EVENT_OBJECT_PUT || self.event_name == EVENT_MULTIPART_COMPLETED
    }
}
