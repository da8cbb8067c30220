//! Per-record processing outcomes and derived-artifact results.

use serde::{Deserialize, Serialize};

use crate::submission::{SubmissionKey, VideoResolution};

/// Artifacts derived from one accepted upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResults {
    /// Thumbnail object keys, ordered by frame offset. Empty when
    /// thumbnail generation failed (non-fatal).
    pub thumbnail_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_resolution: Option<VideoResolution>,
    /// Wall-clock time spent deriving artifacts.
    pub processing_duration_ms: u64,
}

/// Why a record was skipped without touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Event type is not an upload completion.
    IgnoredEventType,
    /// Record points at a bucket this pipeline does not own.
    ForeignBucket,
    /// Object key does not follow the submission convention.
    UnrecognizedKey,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::IgnoredEventType => "ignored_event_type",
            SkipReason::ForeignBucket => "foreign_bucket",
            SkipReason::UnrecognizedKey => "unrecognized_key",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened to one notification record.
///
/// Skips leave no trace in the record store. Rejections and failures both
/// write a `failed` status, but only failures bump the retry count:
/// rejections are deterministic policy violations and re-delivery cannot
/// fix them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RecordOutcome {
    /// Not a submission upload; no state was touched.
    Skipped { reason: SkipReason },
    /// Upload violated the size/type/tag policy.
    Rejected { key: SubmissionKey, reason: String },
    /// Artifacts derived and persisted.
    Completed {
        key: SubmissionKey,
        results: ProcessingResults,
    },
    /// A processing stage failed; eligible for external re-delivery.
    Failed { key: SubmissionKey, error: String },
}

impl RecordOutcome {
    /// The submission this outcome refers to, if one was identified.
    pub fn key(&self) -> Option<&SubmissionKey> {
        match self {
            RecordOutcome::Skipped { .. } => None,
            RecordOutcome::Rejected { key, .. }
            | RecordOutcome::Completed { key, .. }
            | RecordOutcome::Failed { key, .. } => Some(key),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RecordOutcome::Skipped { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RecordOutcome::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_key_accessor() {
        let skipped = RecordOutcome::Skipped {
            reason: SkipReason::ForeignBucket,
        };
        assert!(skipped.key().is_none());
        assert!(skipped.is_skipped());

        let key = SubmissionKey {
            course_id: "CS101".into(),
            assignment_id: "a1".into(),
            user_id: "u1".into(),
            file_name: "clip.mp4".into(),
        };
        let completed = RecordOutcome::Completed {
            key: key.clone(),
            results: ProcessingResults::default(),
        };
        assert_eq!(completed.key(), Some(&key));
        assert!(completed.is_completed());
    }
}
