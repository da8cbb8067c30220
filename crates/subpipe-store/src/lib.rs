//! Keyed submission record store.
//!
//! This crate provides:
//! - The [`SubmissionStore`] trait (status, results, retry bookkeeping)
//! - A DynamoDB implementation using update expressions
//! - Store error taxonomy

pub mod dynamo;
pub mod error;
pub mod submission_store;

pub use dynamo::DynamoSubmissionStore;
pub use error::{StoreError, StoreResult};
pub use submission_store::SubmissionStore;
