//! Media probe trait and the simulated implementation.

use async_trait::async_trait;
use tracing::debug;

use subpipe_models::VideoResolution;

use crate::error::MediaResult;

/// Duration and resolution of one video object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaInfo {
    pub duration_seconds: f64,
    pub resolution: VideoResolution,
}

/// The media-processing capability the pipeline invokes.
///
/// The real transcoder is an external system; the pipeline trusts
/// whatever implementation it is handed. Probe and render failures are
/// absorbed by the artifact generator, so implementations are free to
/// fail loudly.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Estimate or extract duration and resolution for one object.
    async fn probe(&self, bucket: &str, key: &str, size_bytes: u64) -> MediaResult<MediaInfo>;

    /// Render a single thumbnail frame at the given offset as JPEG bytes.
    async fn render_thumbnail(
        &self,
        bucket: &str,
        key: &str,
        offset_seconds: u32,
    ) -> MediaResult<Vec<u8>>;
}

/// Bitrate assumed when estimating duration from object size.
const ESTIMATED_BYTES_PER_SECOND: u64 = 625_000; // ~5 Mbps

/// Simulated probe used until a real transcoder is wired in.
///
/// Duration is estimated from the object size at a nominal bitrate;
/// resolution is reported as 1080p; thumbnails are placeholder JPEGs.
/// Deterministic, so tests can assert on derived values.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMediaProbe;

#[async_trait]
impl MediaProbe for SimulatedMediaProbe {
    async fn probe(&self, _bucket: &str, key: &str, size_bytes: u64) -> MediaResult<MediaInfo> {
        let duration_seconds = (size_bytes as f64 / ESTIMATED_BYTES_PER_SECOND as f64).max(1.0);
        debug!(key, duration_seconds, "Simulated media probe");

        Ok(MediaInfo {
            duration_seconds,
            resolution: VideoResolution {
                width: 1920,
                height: 1080,
            },
        })
    }

    async fn render_thumbnail(
        &self,
        _bucket: &str,
        key: &str,
        offset_seconds: u32,
    ) -> MediaResult<Vec<u8>> {
        debug!(key, offset_seconds, "Rendering placeholder thumbnail");

        // Minimal valid JPEG: SOI marker followed by EOI.
        Ok(vec![0xFF, 0xD8, 0xFF, 0xD9])
    }
}
