//! Response types returned by the engine

use crate::review::{ReviewItem, ReviewPriority, ReviewState};
use crate::validation::{ValidationResult, ValidationStatus};
use chrono::{DateTime, Utc};
use floorgate_llm::LayoutProposal;
use serde::{Deserialize, Serialize};

/// Review-side view of a queued response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewHandle {
    /// Current review state
    pub state: ReviewState,
    /// Queue priority
    pub priority: ReviewPriority,
    /// Reviewer holding or having decided the item
    #[serde(default)]
    pub reviewer: Option<String>,
    /// Disposition of the reviewer's edited proposal, once re-validated
    #[serde(default)]
    pub revalidation: Option<ValidationStatus>,
    /// When the reviewer decided
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl From<&ReviewItem> for ReviewHandle {
    fn from(item: &ReviewItem) -> Self {
        Self {
            state: item.state,
            priority: item.priority,
            reviewer: item.reviewer.clone(),
            revalidation: item.revalidation.as_ref().map(|r| r.status),
            decided_at: item.decided_at,
        }
    }
}

/// Terminal answer for one correlation id
///
/// The stored copy is what every resubmission of the id returns. Status
/// polling overlays the live review state on `review`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResponse {
    /// Correlation id
    pub correlation_id: String,
    /// Disposition of the final attempt
    pub status: ValidationStatus,
    /// Whether a human has to look at the layout
    pub requires_human_review: bool,
    /// Validation result of the final attempt
    pub validation: ValidationResult,
    /// Proposal of the final attempt
    pub proposal: LayoutProposal,
    /// Number of attempts made (2 when a correction pass ran)
    pub attempts: u32,
    /// Review handle when the response was queued
    #[serde(default)]
    pub review: Option<ReviewHandle>,
    /// When the response became terminal
    pub created_at: DateTime<Utc>,
}

impl LayoutResponse {
    /// Whether the response waits on (or went through) human review
    #[must_use]
    pub fn is_queued(&self) -> bool {
        self.review.is_some()
    }
}
