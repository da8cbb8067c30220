//! Blob storage access for the submission pipeline.
//!
//! This crate provides:
//! - The [`ObjectStore`] trait the pipeline is written against
//! - An S3 implementation (metadata reads, thumbnail writes)
//! - Storage error taxonomy

pub mod client;
pub mod error;
pub mod object_store;

pub use client::S3ObjectStore;
pub use error::{StorageError, StorageResult};
pub use object_store::ObjectStore;
