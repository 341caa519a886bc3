use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::types::{
    ReviewDecision, ReviewError, ReviewFilter, ReviewItem, ReviewPriority, ReviewState,
};
use crate::validation::ValidationResult;
use floorgate_llm::LayoutProposal;

type Result<T> = std::result::Result<T, ReviewError>;

#[derive(Default)]
struct QueueState {
    items: HashMap<String, ReviewItem>,
    /// Pending items ordered by (priority, FIFO sequence)
    pending: BTreeMap<(ReviewPriority, u64), String>,
    next_sequence: u64,
}

impl QueueState {
    fn take_claim(&mut self, correlation_id: &str, reviewer: &str) -> Option<ReviewItem> {
        let item = self.items.get_mut(correlation_id)?;
        if item.state != ReviewState::Pending {
            return None;
        }
        self.pending.remove(&(item.priority, item.sequence));
        item.state = ReviewState::InReview;
        item.reviewer = Some(reviewer.to_string());
        item.claimed_at = Some(Utc::now());
        Some(item.clone())
    }

    fn claimed_by(&mut self, correlation_id: &str, reviewer: &str) -> Result<&mut ReviewItem> {
        let item = self
            .items
            .get_mut(correlation_id)
            .ok_or_else(|| ReviewError::NotFound(correlation_id.to_string()))?;
        if item.state.is_terminal() {
            return Err(ReviewError::AlreadyResolved(correlation_id.to_string()));
        }
        if item.state != ReviewState::InReview || item.reviewer.as_deref() != Some(reviewer) {
            return Err(ReviewError::NotClaimedBy {
                correlation_id: correlation_id.to_string(),
                reviewer: reviewer.to_string(),
            });
        }
        Ok(item)
    }
}

/// Priority-then-FIFO queue of review items
///
/// Every state change happens under one lock, so a claim is a
/// compare-and-swap from `Pending` to `InReview`: of two concurrent claims
/// on the same item exactly one wins.
pub struct ReviewQueue {
    state: Mutex<QueueState>,
}

impl Default for ReviewQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Add a pending item; at most one item per correlation id
    pub async fn enqueue(&self, mut item: ReviewItem) -> Result<ReviewItem> {
        let mut state = self.state.lock().await;
        if state.items.contains_key(&item.correlation_id) {
            return Err(ReviewError::AlreadyQueued(item.correlation_id));
        }

        item.sequence = state.next_sequence;
        item.state = ReviewState::Pending;
        state.next_sequence += 1;
        state
            .pending
            .insert((item.priority, item.sequence), item.correlation_id.clone());
        state.items.insert(item.correlation_id.clone(), item.clone());

        debug!(
            correlation_id = %item.correlation_id,
            priority = ?item.priority,
            sequence = item.sequence,
            "Enqueued review item"
        );
        Ok(item)
    }

    /// Reload persisted items, keeping their states and sequences
    pub async fn restore(&self, items: impl IntoIterator<Item = ReviewItem>) -> usize {
        let mut state = self.state.lock().await;
        let mut restored = 0;
        for item in items {
            if state.items.contains_key(&item.correlation_id) {
                continue;
            }
            state.next_sequence = state.next_sequence.max(item.sequence + 1);
            if item.state == ReviewState::Pending {
                state
                    .pending
                    .insert((item.priority, item.sequence), item.correlation_id.clone());
            }
            state.items.insert(item.correlation_id.clone(), item);
            restored += 1;
        }
        info!(restored, "Restored review items");
        restored
    }

    /// Drop an item that could not be persisted
    pub async fn discard(&self, correlation_id: &str) -> Option<ReviewItem> {
        let mut state = self.state.lock().await;
        let item = state.items.remove(correlation_id)?;
        state.pending.remove(&(item.priority, item.sequence));
        Some(item)
    }

    /// Claim the highest-priority, oldest pending item
    pub async fn claim(&self, reviewer: &str) -> Option<ReviewItem> {
        let mut state = self.state.lock().await;
        let correlation_id = state.pending.values().next()?.clone();
        state.take_claim(&correlation_id, reviewer)
    }

    /// Claim a specific item; `None` if it is not pending
    pub async fn claim_by_id(&self, correlation_id: &str, reviewer: &str) -> Result<Option<ReviewItem>> {
        let mut state = self.state.lock().await;
        if !state.items.contains_key(correlation_id) {
            return Err(ReviewError::NotFound(correlation_id.to_string()));
        }
        Ok(state.take_claim(correlation_id, reviewer))
    }

    /// Return a claimed item to the queue at its original position
    pub async fn release(&self, correlation_id: &str, reviewer: &str) -> Result<ReviewItem> {
        let mut state = self.state.lock().await;
        let item = state.claimed_by(correlation_id, reviewer)?;
        item.state = ReviewState::Pending;
        item.reviewer = None;
        item.claimed_at = None;
        let released = item.clone();
        state
            .pending
            .insert((released.priority, released.sequence), released.correlation_id.clone());
        Ok(released)
    }

    /// Check that `reviewer` holds the item, without changing it
    pub async fn ensure_claimed(&self, correlation_id: &str, reviewer: &str) -> Result<ReviewItem> {
        let mut state = self.state.lock().await;
        state.claimed_by(correlation_id, reviewer).map(|item| item.clone())
    }

    /// Resolve a claimed item
    pub async fn resolve(
        &self,
        correlation_id: &str,
        reviewer: &str,
        decision: ReviewDecision,
        edited: Option<(LayoutProposal, ValidationResult)>,
    ) -> Result<ReviewItem> {
        match (decision, &edited) {
            (ReviewDecision::Edit, None) => return Err(ReviewError::MissingEditedProposal),
            (ReviewDecision::Approve | ReviewDecision::Reject, Some(_)) => {
                return Err(ReviewError::UnexpectedEditedProposal)
            }
            _ => {}
        }

        let mut state = self.state.lock().await;
        let item = state.claimed_by(correlation_id, reviewer)?;
        item.state = decision.target_state();
        item.decided_at = Some(Utc::now());
        if let Some((proposal, revalidation)) = edited {
            item.edited_proposal = Some(proposal);
            item.revalidation = Some(revalidation);
        }

        info!(
            correlation_id,
            reviewer,
            state = %item.state,
            "Review item resolved"
        );
        Ok(item.clone())
    }

    /// Put back the claimed snapshot of an item whose resolution was not persisted
    pub async fn reopen(&self, claimed: ReviewItem) {
        let mut state = self.state.lock().await;
        if let Some(item) = state.items.get_mut(&claimed.correlation_id) {
            debug!(correlation_id = %claimed.correlation_id, "Reopened review item");
            *item = claimed;
        }
    }

    /// Get an item by correlation id
    pub async fn get(&self, correlation_id: &str) -> Option<ReviewItem> {
        self.state.lock().await.items.get(correlation_id).cloned()
    }

    /// Items passing `filter`, in queue order
    pub async fn list(&self, filter: &ReviewFilter) -> Vec<ReviewItem> {
        let state = self.state.lock().await;
        let mut items: Vec<ReviewItem> = state
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.priority, item.sequence));
        if let Some(limit) = filter.limit {
            items.truncate(limit);
        }
        items
    }

    /// Number of pending items
    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending.len()
    }
}
