//! Upload validation policy.
//!
//! Pure and deterministic: given fetched object metadata, decide whether
//! the upload is acceptable. Rules run in order and the first violation
//! wins. Rejections are terminal; they are never retried.

use subpipe_models::ObjectMetadata;

/// Maximum accepted upload size: 500 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 524_288_000;

/// Accepted video content types.
pub const SUPPORTED_CONTENT_TYPES: [&str; 4] =
    ["video/mp4", "video/avi", "video/mov", "video/webm"];

/// Custom tags every submission upload must carry, checked in order.
pub const REQUIRED_TAGS: [&str; 4] = ["assignment-id", "course-id", "upload-type", "user-id"];

/// Outcome of validating one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(String),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }
}

/// Validate one upload against the size/type/tag policy.
pub fn validate_upload(metadata: &ObjectMetadata) -> ValidationOutcome {
    if metadata.size_bytes > MAX_UPLOAD_BYTES {
        return ValidationOutcome::Rejected(format!(
            "File size {} bytes exceeds the {} byte limit",
            metadata.size_bytes, MAX_UPLOAD_BYTES
        ));
    }

    if !SUPPORTED_CONTENT_TYPES.contains(&metadata.content_type.as_str()) {
        return ValidationOutcome::Rejected(format!(
            "Unsupported content type '{}'; supported types: {}",
            metadata.content_type,
            SUPPORTED_CONTENT_TYPES.join(", ")
        ));
    }

    for tag in REQUIRED_TAGS {
        if metadata.tag(tag).is_none() {
            return ValidationOutcome::Rejected(format!("Missing required tag: {tag}"));
        }
    }

    ValidationOutcome::Accepted
}
