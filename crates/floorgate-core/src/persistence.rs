//! Persistence facade over the audit store
//!
//! Every component writes through here. Store failures are retried with
//! bounded exponential backoff; once retries are exhausted the caller gets
//! `Error::Persistence` and the attempt fails closed rather than returning
//! an unaudited result.

use crate::error::{Error, Result};
use crate::review::ReviewItem;
use crate::utils::{retry_with_backoff, RetryConfig, RetryError};
use floorgate_replay::{AuditEventType, AuditRecord, AuditStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

/// Retry settings for store writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Attempts per operation, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    50
}

fn default_max_delay_ms() -> u64 {
    2000
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl PersistenceConfig {
    /// Retry configuration for these settings
    #[must_use]
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .with_max_attempts(self.max_attempts)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }
}

fn is_retryable(error: &floorgate_replay::Error) -> bool {
    matches!(error, floorgate_replay::Error::Database(_))
}

fn exhausted(operation: &str, e: RetryError<floorgate_replay::Error>) -> Error {
    error!(operation, attempts = e.attempts, error = %e.last_error, "Persistence failed");
    Error::Persistence(format!("{operation}: {e}"))
}

/// Retrying writer in front of an `AuditStore`
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn AuditStore>,
    retry: RetryConfig,
}

impl Persistence {
    /// Wrap a store
    #[must_use]
    pub fn new(store: Arc<dyn AuditStore>, config: &PersistenceConfig) -> Self {
        Self {
            store,
            retry: config.retry_config(),
        }
    }

    /// Name of the backing store
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Append a lifecycle event
    pub async fn record(
        &self,
        correlation_id: &str,
        event_type: AuditEventType,
        payload: serde_json::Value,
    ) -> Result<AuditRecord> {
        self.append(AuditRecord::new(correlation_id, event_type).with_payload(payload))
            .await
    }

    /// Append a lifecycle event with its duration
    pub async fn record_timed(
        &self,
        correlation_id: &str,
        event_type: AuditEventType,
        payload: serde_json::Value,
        duration: Duration,
    ) -> Result<AuditRecord> {
        let record = AuditRecord::new(correlation_id, event_type)
            .with_payload(payload)
            .with_duration(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX));
        self.append(record).await
    }

    async fn append(&self, record: AuditRecord) -> Result<AuditRecord> {
        retry_with_backoff(
            &self.retry,
            || {
                let store = Arc::clone(&self.store);
                let record = record.clone();
                async move { store.append(record).await }
            },
            is_retryable,
        )
        .await
        .map_err(|e| exhausted("append", e))
    }

    /// Audit trail in sequence order
    pub async fn trail(&self, correlation_id: &str) -> Result<Vec<AuditRecord>> {
        retry_with_backoff(&self.retry, || self.store.trail(correlation_id), is_retryable)
            .await
            .map_err(|e| exhausted("trail", e))
    }

    /// Store the terminal response; returns whichever payload is stored
    pub async fn store_terminal(&self, correlation_id: &str, payload: &str) -> Result<String> {
        retry_with_backoff(
            &self.retry,
            || self.store.insert_terminal(correlation_id, payload),
            is_retryable,
        )
        .await
        .map_err(|e| exhausted("insert_terminal", e))
    }

    /// Cached terminal response, if any
    pub async fn terminal(&self, correlation_id: &str) -> Result<Option<String>> {
        retry_with_backoff(&self.retry, || self.store.terminal(correlation_id), is_retryable)
            .await
            .map_err(|e| exhausted("terminal", e))
    }

    /// Persist the current snapshot of a review item
    pub async fn save_review(&self, item: &ReviewItem) -> Result<()> {
        let payload =
            serde_json::to_string(item).map_err(|e| Error::Internal(e.to_string()))?;
        retry_with_backoff(
            &self.retry,
            || self.store.save_review(&item.correlation_id, &payload),
            is_retryable,
        )
        .await
        .map_err(|e| exhausted("save_review", e))
    }

    /// Drop the persisted snapshot of a review item
    pub async fn delete_review(&self, correlation_id: &str) -> Result<()> {
        retry_with_backoff(
            &self.retry,
            || self.store.delete_review(correlation_id),
            is_retryable,
        )
        .await
        .map_err(|e| exhausted("delete_review", e))
    }

    /// Every persisted review item; unreadable snapshots are skipped
    pub async fn load_reviews(&self) -> Result<Vec<ReviewItem>> {
        let payloads = retry_with_backoff(&self.retry, || self.store.load_reviews(), is_retryable)
            .await
            .map_err(|e| exhausted("load_reviews", e))?;

        Ok(payloads
            .iter()
            .filter_map(|p| match serde_json::from_str(p) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable review snapshot");
                    None
                }
            })
            .collect())
    }
}
