//! Shared data models for the submission upload pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Inbound upload-notification batches
//! - Submission keys, statuses and persisted records
//! - Object metadata fetched from blob storage
//! - Per-record processing outcomes and derived-artifact results

pub mod metadata;
pub mod notification;
pub mod outcome;
pub mod submission;

// Re-export common types
pub use metadata::ObjectMetadata;
pub use notification::{NotificationBatch, NotificationRecord};
pub use outcome::{ProcessingResults, RecordOutcome, SkipReason};
pub use submission::{SubmissionKey, SubmissionRecord, SubmissionStatus, VideoResolution};
