//! Object metadata as reported by the storage backend.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one stored object, fetched per record.
///
/// Transient; never persisted. Missing attributes fall back to the
/// defaults in [`ObjectMetadata::new`] so the validator always sees a
/// fully populated value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Object size in bytes. Missing size reads as 0.
    pub size_bytes: u64,
    /// MIME type. Missing type reads as `application/octet-stream`.
    pub content_type: String,
    /// Custom tags attached at upload time.
    pub custom_tags: HashMap<String, String>,
    /// Last-modified timestamp. Missing reads as "now".
    pub last_modified: DateTime<Utc>,
}

impl ObjectMetadata {
    /// Build metadata from optional storage attributes, applying defaults.
    pub fn new(
        size_bytes: Option<u64>,
        content_type: Option<String>,
        custom_tags: Option<HashMap<String, String>>,
        last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            size_bytes: size_bytes.unwrap_or(0),
            content_type: content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            custom_tags: custom_tags.unwrap_or_default(),
            last_modified: last_modified.unwrap_or_else(Utc::now),
        }
    }

    /// Look up a custom tag, treating empty values as absent.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.custom_tags
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}
