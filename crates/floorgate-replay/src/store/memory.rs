//! MemoryAuditStore - in-process audit storage

use super::traits::AuditStore;
use crate::error::Result;
use crate::event::AuditRecord;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory audit store (tests, `memory` storage backend)
#[derive(Default)]
pub struct MemoryAuditStore {
    records: RwLock<HashMap<String, Vec<AuditRecord>>>,
    terminals: RwLock<HashMap<String, String>>,
    /// payload plus insertion order
    reviews: RwLock<HashMap<String, (u64, String)>>,
}

impl MemoryAuditStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all correlation ids
    pub async fn record_count(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait::async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, mut record: AuditRecord) -> Result<AuditRecord> {
        let mut records = self.records.write().await;
        let trail = records.entry(record.correlation_id.clone()).or_default();
        record.sequence_num = i64::try_from(trail.len()).unwrap_or(i64::MAX).saturating_add(1);
        trail.push(record.clone());
        Ok(record)
    }

    async fn trail(&self, correlation_id: &str) -> Result<Vec<AuditRecord>> {
        let records = self.records.read().await;
        Ok(records.get(correlation_id).cloned().unwrap_or_default())
    }

    async fn insert_terminal(&self, correlation_id: &str, payload: &str) -> Result<String> {
        let mut terminals = self.terminals.write().await;
        let stored = terminals
            .entry(correlation_id.to_string())
            .or_insert_with(|| payload.to_string());
        Ok(stored.clone())
    }

    async fn terminal(&self, correlation_id: &str) -> Result<Option<String>> {
        Ok(self.terminals.read().await.get(correlation_id).cloned())
    }

    async fn save_review(&self, correlation_id: &str, payload: &str) -> Result<()> {
        let mut reviews = self.reviews.write().await;
        let next = reviews.values().map(|(order, _)| order + 1).max().unwrap_or(0);
        reviews
            .entry(correlation_id.to_string())
            .and_modify(|(_, p)| *p = payload.to_string())
            .or_insert_with(|| (next, payload.to_string()));
        Ok(())
    }

    async fn delete_review(&self, correlation_id: &str) -> Result<()> {
        self.reviews.write().await.remove(correlation_id);
        Ok(())
    }

    async fn load_reviews(&self) -> Result<Vec<String>> {
        let reviews = self.reviews.read().await;
        let mut ordered: Vec<_> = reviews.values().cloned().collect();
        ordered.sort_by_key(|(order, _)| *order);
        Ok(ordered.into_iter().map(|(_, payload)| payload).collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
