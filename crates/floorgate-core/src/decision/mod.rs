//! Decision - Disposition state machine
//!
//! Maps a pipeline outcome to one of the four terminal statuses, then
//! applies the human-review policy in one place: no AI output skips review
//! unless the caller's tier is explicitly configured for auto-approval.

use crate::error::{Error, Result};
use crate::validation::{PipelineOutcome, Severity, ValidationResult, ValidationStatus};
use chrono::Utc;
use floorgate_llm::LayoutRequest;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decision thresholds and the auto-approve policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// Below this confidence an attempt goes to manual review
    #[serde(default = "default_review_threshold")]
    pub review_threshold: f64,
    /// At or above this confidence, with no errors, an attempt is `Valid`
    #[serde(default = "default_high_confidence")]
    pub high_confidence_threshold: f64,
    /// More critical findings than this means `Rejected`
    #[serde(default = "default_reject_critical_count")]
    pub reject_critical_count: usize,
    /// Tiers whose non-review dispositions skip human review
    #[serde(default)]
    pub auto_approve_tiers: Vec<String>,
}

fn default_review_threshold() -> f64 {
    0.7
}

fn default_high_confidence() -> f64 {
    0.9
}

fn default_reject_critical_count() -> usize {
    2
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            review_threshold: default_review_threshold(),
            high_confidence_threshold: default_high_confidence(),
            reject_critical_count: default_reject_critical_count(),
            auto_approve_tiers: Vec::new(),
        }
    }
}

impl DecisionPolicy {
    /// Enable auto-approval for a tier
    #[must_use]
    pub fn with_auto_approve_tier(mut self, tier: impl Into<String>) -> Self {
        self.auto_approve_tiers.push(tier.into());
        self
    }

    /// Whether `tier` is configured for auto-approval
    #[must_use]
    pub fn auto_approves(&self, tier: Option<&str>) -> bool {
        tier.is_some_and(|t| self.auto_approve_tiers.iter().any(|a| a.eq_ignore_ascii_case(t)))
    }
}

/// Lifecycle of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "status")]
pub enum AttemptState {
    /// Accepted, waiting for a proposal
    Pending,
    /// Proposal acquired, checks running
    Validating,
    /// Terminal for this attempt
    Decided(ValidationStatus),
}

impl AttemptState {
    /// Move to `next`, refusing anything but Pending → Validating → Decided
    pub fn transition(self, next: AttemptState) -> Result<AttemptState> {
        match (self, next) {
            (Self::Pending, Self::Validating) | (Self::Validating, Self::Decided(_)) => Ok(next),
            _ => Err(Error::Internal(format!(
                "illegal attempt transition {self:?} -> {next:?}"
            ))),
        }
    }

    /// Whether the attempt has a disposition
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Decided(_))
    }
}

/// Assigns dispositions
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    policy: DecisionPolicy,
}

impl DecisionEngine {
    /// Create an engine with a policy
    #[must_use]
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    /// The active policy
    #[must_use]
    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Review threshold for a request; a caller may only make it stricter
    #[must_use]
    pub fn review_threshold(&self, request: &LayoutRequest) -> f64 {
        match request.ai_options.confidence_threshold {
            Some(t) if t.is_finite() => t.clamp(0.0, 1.0).max(self.policy.review_threshold),
            _ => self.policy.review_threshold,
        }
    }

    /// Status from findings and confidence, rules evaluated in order
    #[must_use]
    pub fn classify(&self, outcome: &PipelineOutcome, review_threshold: f64) -> ValidationStatus {
        let critical = outcome.count(Severity::Critical);
        let errors = outcome.count(Severity::Error);

        if critical > 0 || outcome.used_fallback {
            if critical > self.policy.reject_critical_count {
                ValidationStatus::Rejected
            } else {
                ValidationStatus::RequiresManualReview
            }
        } else if outcome.confidence < review_threshold {
            ValidationStatus::RequiresManualReview
        } else if errors > 0 {
            ValidationStatus::InvalidButCorrectable
        } else if outcome.confidence >= self.policy.high_confidence_threshold {
            ValidationStatus::Valid
        } else {
            ValidationStatus::RequiresManualReview
        }
    }

    /// Human review is forced unless the tier auto-approves and the attempt is `Valid`
    #[must_use]
    pub fn requires_human_review(&self, tier: Option<&str>, status: ValidationStatus) -> bool {
        !(self.policy.auto_approves(tier) && status == ValidationStatus::Valid)
    }

    /// Decide a validated attempt
    pub fn decide(
        &self,
        correlation_id: &str,
        attempt: u32,
        request: &LayoutRequest,
        outcome: PipelineOutcome,
    ) -> ValidationResult {
        let threshold = self.review_threshold(request);
        let status = self.classify(&outcome, threshold);
        let requires_human_review = self.requires_human_review(request.tier.as_deref(), status);

        debug!(
            correlation_id,
            attempt,
            %status,
            confidence = outcome.confidence,
            requires_human_review,
            "Decided attempt"
        );

        let (errors, warnings): (Vec<_>, Vec<_>) = outcome
            .findings
            .into_iter()
            .partition(|f| f.severity >= Severity::Error);

        ValidationResult {
            correlation_id: correlation_id.to_string(),
            attempt,
            status,
            errors,
            warnings,
            confidence: outcome.confidence,
            requires_human_review,
            used_fallback: outcome.used_fallback,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests;
