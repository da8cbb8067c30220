//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The only error that crosses the invocation boundary: the inbound
    /// batch does not match the expected schema, so nothing is processed.
    #[error("Invalid batch format: {0}")]
    InvalidBatchFormat(String),

    #[error("Storage error: {0}")]
    Storage(#[from] subpipe_storage::StorageError),

    #[error("Record store error: {0}")]
    Store(#[from] subpipe_store::StoreError),

    #[error("Media error: {0}")]
    Media(#[from] subpipe_media::MediaError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn invalid_batch(msg: impl Into<String>) -> Self {
        Self::InvalidBatchFormat(msg.into())
    }
}
