//! Record store error types.

use thiserror::Error;

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur against the keyed record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to configure store client: {0}")]
    ConfigError(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn update_failed(msg: impl Into<String>) -> Self {
        Self::UpdateFailed(msg.into())
    }
}
