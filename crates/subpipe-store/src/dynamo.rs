//! DynamoDB-backed submission store.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::Utc;
use tracing::debug;

use subpipe_models::{ProcessingResults, SubmissionKey, SubmissionStatus};

use crate::error::{StoreError, StoreResult};
use crate::submission_store::SubmissionStore;

/// Submissions table store.
///
/// Partition key `assignmentId`, sort key `userId`. All writes go through
/// `UpdateItem` so concurrent attribute updates merge instead of
/// clobbering the whole item.
#[derive(Clone)]
pub struct DynamoSubmissionStore {
    client: Client,
    table: String,
}

impl DynamoSubmissionStore {
    /// Wrap an already-configured SDK client.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Create from the ambient AWS environment.
    pub async fn from_env(table: impl Into<String>) -> StoreResult<Self> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Ok(Self::new(Client::new(&sdk_config), table))
    }

    async fn update(
        &self,
        key: &SubmissionKey,
        expression: String,
        names: HashMap<String, String>,
        values: HashMap<String, AttributeValue>,
    ) -> StoreResult<()> {
        debug!(submission = %key, %expression, "Updating submission record");

        let mut request = self
            .client
            .update_item()
            .table_name(&self.table)
            .key("assignmentId", AttributeValue::S(key.assignment_id.clone()))
            .key("userId", AttributeValue::S(key.user_id.clone()))
            .update_expression(expression)
            .set_expression_attribute_values(Some(values));

        if !names.is_empty() {
            request = request.set_expression_attribute_names(Some(names));
        }

        request
            .send()
            .await
            .map_err(|e| StoreError::update_failed(e.to_string()))?;

        Ok(())
    }
}

fn now_attr() -> AttributeValue {
    AttributeValue::S(Utc::now().to_rfc3339())
}

#[async_trait]
impl SubmissionStore for DynamoSubmissionStore {
    async fn set_status(
        &self,
        key: &SubmissionKey,
        status: SubmissionStatus,
        error_message: Option<&str>,
    ) -> StoreResult<()> {
        // `status` is a DynamoDB reserved word.
        let mut expression = String::from("SET #status = :status, updatedAt = :now");
        let names = HashMap::from([("#status".to_string(), "status".to_string())]);
        let mut values = HashMap::from([
            (
                ":status".to_string(),
                AttributeValue::S(status.as_str().to_string()),
            ),
            (":now".to_string(), now_attr()),
        ]);

        if let Some(message) = error_message {
            expression.push_str(", errorMessage = :error");
            values.insert(":error".to_string(), AttributeValue::S(message.to_string()));
        }
        if status.is_terminal() {
            expression.push_str(", processedAt = :now");
        }

        self.update(key, expression, names, values).await
    }

    async fn set_results(
        &self,
        key: &SubmissionKey,
        results: &ProcessingResults,
    ) -> StoreResult<()> {
        let mut expression =
            String::from("SET thumbnailUrls = :thumbs, processingDurationMs = :ms, updatedAt = :now");
        let mut values = HashMap::from([
            (
                ":thumbs".to_string(),
                AttributeValue::L(
                    results
                        .thumbnail_urls
                        .iter()
                        .map(|u| AttributeValue::S(u.clone()))
                        .collect(),
                ),
            ),
            (
                ":ms".to_string(),
                AttributeValue::N(results.processing_duration_ms.to_string()),
            ),
            (":now".to_string(), now_attr()),
        ]);

        if let Some(duration) = results.video_duration_seconds {
            expression.push_str(", videoDurationSeconds = :duration");
            values.insert(":duration".to_string(), AttributeValue::N(duration.to_string()));
        }
        if let Some(resolution) = results.video_resolution {
            expression.push_str(", videoResolution = :resolution");
            values.insert(
                ":resolution".to_string(),
                AttributeValue::M(HashMap::from([
                    (
                        "width".to_string(),
                        AttributeValue::N(resolution.width.to_string()),
                    ),
                    (
                        "height".to_string(),
                        AttributeValue::N(resolution.height.to_string()),
                    ),
                ])),
            );
        }

        self.update(key, expression, HashMap::new(), values).await
    }

    async fn increment_retry_count(&self, key: &SubmissionKey) -> StoreResult<()> {
        let expression =
            String::from("SET retryCount = if_not_exists(retryCount, :zero) + :one, updatedAt = :now");
        let values = HashMap::from([
            (":zero".to_string(), AttributeValue::N("0".to_string())),
            (":one".to_string(), AttributeValue::N("1".to_string())),
            (":now".to_string(), now_attr()),
        ]);

        self.update(key, expression, HashMap::new(), values).await
    }
}
