//! Upload-notification processing pipeline.
//!
//! Turns "object uploaded" notifications into validated, status-tracked
//! submission records with derived artifacts (thumbnails, duration,
//! resolution). See the crate layout:
//! - [`batch`] — batch fan-out and failure isolation
//! - [`processor`] — per-record state machine
//! - [`validator`] — size/type/tag policy
//! - [`artifacts`] — thumbnail and media-metadata derivation

pub mod artifacts;
pub mod batch;
pub mod config;
pub mod error;
pub mod processor;
pub mod validator;

pub use artifacts::ArtifactGenerator;
pub use batch::{BatchOrchestrator, BatchSummary};
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use processor::RecordProcessor;
pub use validator::{validate_upload, ValidationOutcome, MAX_UPLOAD_BYTES};
