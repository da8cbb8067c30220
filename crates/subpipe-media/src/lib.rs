//! Media-processing seam for the submission pipeline.
//!
//! This crate provides:
//! - The [`MediaProbe`] trait (duration/resolution probe, thumbnail render)
//! - A deterministic simulated implementation
//! - Media error taxonomy

pub mod error;
pub mod probe;

pub use error::{MediaError, MediaResult};
pub use probe::{MediaInfo, MediaProbe, SimulatedMediaProbe};
