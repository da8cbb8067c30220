//! Media processing error types.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors from the media-processing capability.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("Thumbnail render failed: {0}")]
    ThumbnailFailed(String),

    #[error("Unsupported media: {0}")]
    Unsupported(String),
}

impl MediaError {
    pub fn probe_failed(msg: impl Into<String>) -> Self {
        Self::ProbeFailed(msg.into())
    }

    pub fn thumbnail_failed(msg: impl Into<String>) -> Self {
        Self::ThumbnailFailed(msg.into())
    }
}
