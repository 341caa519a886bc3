//! Correlation-id scoped locks
//!
//! Held from the terminal-cache check until the terminal response is
//! written, so two submissions of one id never both compute. Entries are
//! removed once nobody holds or waits on them.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by correlation id
#[derive(Clone, Default)]
pub struct CorrelationLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl CorrelationLocks {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock for `correlation_id`
    pub async fn acquire(&self, correlation_id: &str) -> CorrelationGuard {
        let lock = self
            .locks
            .entry(correlation_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        CorrelationGuard {
            guard: Some(guard),
            key: correlation_id.to_string(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Whether someone holds or waits on the lock
    #[must_use]
    pub fn is_held(&self, correlation_id: &str) -> bool {
        self.locks.contains_key(correlation_id)
    }

    /// Number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held lock; releasing it drops the table entry when unused
pub struct CorrelationGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: String,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl Drop for CorrelationGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // only the table's own reference left
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_lock_is_exclusive_per_id() {
        let locks = CorrelationLocks::new();
        let held = locks.acquire("a").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _guard = contender.acquire("a").await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        // other ids are unaffected
        let _other = locks.acquire("b").await;

        drop(held);
        waiting.await.unwrap();
    }

    #[tokio::test]
    async fn test_entries_are_cleaned_up() {
        let locks = CorrelationLocks::new();
        {
            let _guard = locks.acquire("a").await;
            assert!(locks.is_held("a"));
        }
        assert!(!locks.is_held("a"));
        assert!(locks.is_empty());
    }
}
