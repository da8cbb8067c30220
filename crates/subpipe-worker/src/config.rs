//! Pipeline configuration.

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Submissions table name
    pub submissions_table: String,
    /// Bucket uploads are delivered to; records for other buckets are skipped
    pub media_bucket: String,
    /// Bucket derived thumbnails are written to
    pub thumbnail_bucket: String,
    /// Seconds between thumbnail frame offsets
    pub thumbnail_interval_secs: u32,
    /// Maximum records processed concurrently within one batch
    pub max_concurrent_records: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            submissions_table: "submissions".to_string(),
            media_bucket: "demo-project-videos".to_string(),
            thumbnail_bucket: "demo-project-thumbnails".to_string(),
            thumbnail_interval_secs: 10,
            max_concurrent_records: 8,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            submissions_table: std::env::var("SUBMISSIONS_TABLE")
                .unwrap_or(defaults.submissions_table),
            media_bucket: std::env::var("MEDIA_BUCKET").unwrap_or(defaults.media_bucket),
            thumbnail_bucket: std::env::var("THUMBNAIL_BUCKET")
                .unwrap_or(defaults.thumbnail_bucket),
            thumbnail_interval_secs: std::env::var("THUMBNAIL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.thumbnail_interval_secs),
            max_concurrent_records: std::env::var("PIPELINE_MAX_CONCURRENT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent_records),
        }
    }
}
