//! Submission identity, status lifecycle and persisted record shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::ProcessingResults;

/// Identity of one submission, parsed from an object key.
///
/// Keys follow the convention
/// `{courseId}/{assignmentId}/{userId}/{unixMillis}_{fileName}`.
/// The persisted record is keyed by `(assignment_id, user_id)`;
/// `course_id` and `file_name` ride along for logging and artifact paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionKey {
    pub course_id: String,
    pub assignment_id: String,
    pub user_id: String,
    pub file_name: String,
}

impl SubmissionKey {
    /// Parse an object key into a submission key.
    ///
    /// Returns `None` for any key that does not follow the submission
    /// convention. Callers treat `None` as "not a submission object" and
    /// skip the record; it is never an error.
    pub fn parse(object_key: &str) -> Option<Self> {
        let mut segments = object_key.splitn(4, '/');
        let course_id = segments.next()?;
        let assignment_id = segments.next()?;
        let user_id = segments.next()?;
        let rest = segments.next()?;

        // Strip the leading `{unixMillis}_` prefix from the file segment.
        let (timestamp, file_name) = rest.split_once('_')?;
        if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        if course_id.is_empty() || assignment_id.is_empty() || user_id.is_empty() || file_name.is_empty() {
            return None;
        }

        Some(Self {
            course_id: course_id.to_string(),
            assignment_id: assignment_id.to_string(),
            user_id: user_id.to_string(),
            file_name: file_name.to_string(),
        })
    }
}

impl std::fmt::Display for SubmissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.assignment_id, self.user_id)
    }
}

/// Submission processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Upload initiated but not yet processed (set by the upload flow).
    #[default]
    Uploading,
    /// Pipeline is deriving artifacts for this submission.
    Processing,
    /// All artifacts derived and persisted.
    Completed,
    /// Validation rejected the upload or a processing stage failed.
    Failed,
}

impl SubmissionStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Uploading => "uploading",
            SubmissionStatus::Processing => "processing",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more transitions this attempt).
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Completed | SubmissionStatus::Failed)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Video frame dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResolution {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The persisted submission record, keyed by `(assignment_id, user_id)`.
///
/// Created by the upload-initiation flow; this pipeline only mutates it
/// through the submission store and never deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub assignment_id: String,
    pub user_id: String,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_resolution: Option<VideoResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_duration_ms: Option<u64>,
    /// Incremented only on transient processing failures, never on
    /// validation rejections.
    #[serde(default)]
    pub retry_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Create a fresh record in the implicit initial state.
    pub fn new(assignment_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            assignment_id: assignment_id.into(),
            user_id: user_id.into(),
            status: SubmissionStatus::Uploading,
            error_message: None,
            processed_at: None,
            thumbnail_urls: None,
            video_duration_seconds: None,
            video_resolution: None,
            processing_duration_ms: None,
            retry_count: 0,
            updated_at: Utc::now(),
        }
    }

    /// Apply derived-artifact results to the record.
    pub fn apply_results(&mut self, results: &ProcessingResults) {
        self.thumbnail_urls = Some(results.thumbnail_urls.clone());
        self.processing_duration_ms = Some(results.processing_duration_ms);
        if results.video_duration_seconds.is_some() {
            self.video_duration_seconds = results.video_duration_seconds;
        }
        if results.video_resolution.is_some() {
            self.video_resolution = results.video_resolution;
        }
        self.updated_at = Utc::now();
    }
}
