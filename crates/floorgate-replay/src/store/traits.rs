//! Trait for audit storage backends

use crate::error::Result;
use crate::event::AuditRecord;

/// Trait for audit storage backends
///
/// Three keyed collections live behind one backend: the append-only audit
/// log, the write-once terminal-response cache and the latest snapshot of
/// each correlation id's review item. Payloads are opaque serialized JSON so
/// the store stays independent of the engine's types.
#[async_trait::async_trait]
pub trait AuditStore: Send + Sync {
    /// Append a record and return it with its assigned sequence number
    async fn append(&self, record: AuditRecord) -> Result<AuditRecord>;

    /// Every record for a correlation id, in sequence order
    async fn trail(&self, correlation_id: &str) -> Result<Vec<AuditRecord>>;

    /// Store a terminal response unless one already exists.
    ///
    /// Returns the payload that is stored after the call: the caller's on
    /// first write, the existing one otherwise.
    async fn insert_terminal(&self, correlation_id: &str, payload: &str) -> Result<String>;

    /// Get the terminal response for a correlation id
    async fn terminal(&self, correlation_id: &str) -> Result<Option<String>>;

    /// Insert or replace the review-item snapshot for a correlation id
    async fn save_review(&self, correlation_id: &str, payload: &str) -> Result<()>;

    /// Remove the review-item snapshot for a correlation id, if any
    async fn delete_review(&self, correlation_id: &str) -> Result<()>;

    /// All review-item snapshots, oldest first
    async fn load_reviews(&self) -> Result<Vec<String>>;

    /// Get the store name (for logging)
    fn name(&self) -> &str;
}
