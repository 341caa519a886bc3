use crate::validation::{Severity, ValidationResult, ValidationStatus};
use chrono::{DateTime, Utc};
use floorgate_llm::{LayoutProposal, LayoutRequest};
use serde::{Deserialize, Serialize};

/// State of a review item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Waiting for a reviewer
    Pending,
    /// Claimed by a reviewer
    InReview,
    /// Reviewer accepted the proposal
    Approved,
    /// Reviewer rejected the proposal
    Rejected,
    /// Reviewer supplied a replacement proposal
    Edited,
}

impl ReviewState {
    /// Whether the item is resolved
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Edited)
    }
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Edited => "edited",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ReviewState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_review" => Ok(Self::InReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "edited" => Ok(Self::Edited),
            _ => Err(format!("unknown review state: {s}")),
        }
    }
}

/// Queue priority; `Critical` is served first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPriority {
    /// Rejected or physically impossible geometry
    Critical,
    /// Fallback output or very low confidence
    High,
    /// Out-of-policy findings
    Normal,
    /// Everything else
    Low,
}

impl ReviewPriority {
    /// Derive the priority of a validation result
    #[must_use]
    pub fn from_result(result: &ValidationResult) -> Self {
        let critical = result.errors.iter().any(|f| f.severity == Severity::Critical);
        if result.status == ValidationStatus::Rejected || critical {
            Self::Critical
        } else if result.used_fallback || result.confidence < 0.5 {
            Self::High
        } else if !result.errors.is_empty() {
            Self::Normal
        } else {
            Self::Low
        }
    }
}

impl std::str::FromStr for ReviewPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            _ => Err(format!("unknown review priority: {s}")),
        }
    }
}

/// A reviewer's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    /// Accept as proposed
    Approve,
    /// Refuse
    Reject,
    /// Replace with an edited proposal
    Edit,
}

impl ReviewDecision {
    /// Terminal state this decision leads to
    #[must_use]
    pub fn target_state(&self) -> ReviewState {
        match self {
            Self::Approve => ReviewState::Approved,
            Self::Reject => ReviewState::Rejected,
            Self::Edit => ReviewState::Edited,
        }
    }
}

impl std::str::FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(Self::Approve),
            "reject" | "rejected" => Ok(Self::Reject),
            "edit" | "edited" => Ok(Self::Edit),
            _ => Err(format!("unknown review decision: {s}")),
        }
    }
}

/// A proposal awaiting, or having received, a human decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Correlation id
    pub correlation_id: String,
    /// The accepted request, needed to re-validate edits
    pub request: LayoutRequest,
    /// The proposal under review
    pub proposal: LayoutProposal,
    /// Its validation result
    pub validation: ValidationResult,
    /// Queue priority
    pub priority: ReviewPriority,
    /// Current state
    pub state: ReviewState,
    /// Reviewer holding or having resolved the item
    pub reviewer: Option<String>,
    /// FIFO position within the priority, kept across release
    pub sequence: u64,
    /// Replacement proposal for `Edited` items
    pub edited_proposal: Option<LayoutProposal>,
    /// Validation of the replacement proposal
    pub revalidation: Option<ValidationResult>,
    /// When the item was enqueued
    pub created_at: DateTime<Utc>,
    /// When the item was last claimed
    pub claimed_at: Option<DateTime<Utc>>,
    /// When the decision was made
    pub decided_at: Option<DateTime<Utc>>,
}

impl ReviewItem {
    /// Create a pending item; the queue assigns the sequence
    #[must_use]
    pub fn new(request: LayoutRequest, proposal: LayoutProposal, validation: ValidationResult) -> Self {
        Self {
            correlation_id: validation.correlation_id.clone(),
            priority: ReviewPriority::from_result(&validation),
            request,
            proposal,
            validation,
            state: ReviewState::Pending,
            reviewer: None,
            sequence: 0,
            edited_proposal: None,
            revalidation: None,
            created_at: Utc::now(),
            claimed_at: None,
            decided_at: None,
        }
    }
}

/// Filter for listing review items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewFilter {
    /// Only items in this state
    #[serde(default)]
    pub state: Option<ReviewState>,
    /// Only items of this priority
    #[serde(default)]
    pub priority: Option<ReviewPriority>,
    /// Only items held by this reviewer
    #[serde(default)]
    pub reviewer: Option<String>,
    /// At most this many items
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ReviewFilter {
    /// Pending items only
    #[must_use]
    pub fn pending() -> Self {
        Self {
            state: Some(ReviewState::Pending),
            ..Self::default()
        }
    }

    /// Whether an item passes the filter
    #[must_use]
    pub fn matches(&self, item: &ReviewItem) -> bool {
        self.state.map_or(true, |s| item.state == s)
            && self.priority.map_or(true, |p| item.priority == p)
            && self
                .reviewer
                .as_deref()
                .map_or(true, |r| item.reviewer.as_deref() == Some(r))
    }
}

/// Review queue errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReviewError {
    /// No item for the correlation id
    #[error("no review item for {0}")]
    NotFound(String),

    /// An item already exists for the correlation id
    #[error("review item for {0} already exists")]
    AlreadyQueued(String),

    /// The item is not claimed by this reviewer
    #[error("review item {correlation_id} is not claimed by {reviewer}")]
    NotClaimedBy {
        /// Correlation id
        correlation_id: String,
        /// Reviewer who attempted the action
        reviewer: String,
    },

    /// The item is already resolved
    #[error("review item {0} is already resolved")]
    AlreadyResolved(String),

    /// `Edit` without a replacement proposal
    #[error("an edit decision needs an edited proposal")]
    MissingEditedProposal,

    /// A replacement proposal with a decision other than `Edit`
    #[error("an edited proposal is only accepted with an edit decision")]
    UnexpectedEditedProposal,
}
