//! Upload-processing worker binary.
//!
//! Reads one notification batch (JSON) from a file argument or stdin,
//! processes it against real AWS backends, and exits non-zero only when
//! the batch itself is malformed.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use subpipe_media::SimulatedMediaProbe;
use subpipe_storage::S3ObjectStore;
use subpipe_store::DynamoSubmissionStore;
use subpipe_worker::{BatchOrchestrator, BatchSummary, PipelineConfig, PipelineError};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("subpipe=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting subpipe-worker");

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    let payload = match read_payload() {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to read batch payload: {:#}", e);
            std::process::exit(1);
        }
    };

    let objects = match S3ObjectStore::from_env().await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create storage client: {}", e);
            std::process::exit(1);
        }
    };

    let store = match DynamoSubmissionStore::from_env(config.submissions_table.clone()).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create record store client: {}", e);
            std::process::exit(1);
        }
    };

    let orchestrator =
        BatchOrchestrator::new(config, objects, store, Arc::new(SimulatedMediaProbe));

    match orchestrator.run(&payload).await {
        Ok(outcomes) => {
            let summary = BatchSummary::from_outcomes(&outcomes);
            info!(
                records = summary.total(),
                completed = summary.completed,
                rejected = summary.rejected,
                failed = summary.failed,
                skipped = summary.skipped,
                "Invocation complete"
            );
        }
        Err(PipelineError::InvalidBatchFormat(message)) => {
            error!("Invalid batch format: {}", message);
            std::process::exit(1);
        }
        Err(e) => {
            error!("Pipeline error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Read the batch payload from the first argument, or stdin when absent.
fn read_payload() -> anyhow::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading batch file {path}"))
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading batch from stdin")?;
            Ok(buffer)
        }
    }
}
