//! Review operations
//!
//! Every queue transition is persisted and audited before it is reported
//! back. A claim that cannot be persisted is handed back to the queue, and a
//! resolution that cannot be persisted leaves the item claimed.

use super::Engine;
use crate::error::{Error, Result};
use crate::review::{ReviewDecision, ReviewError, ReviewFilter, ReviewItem};
use crate::validation::ValidationResult;
use floorgate_llm::LayoutProposal;
use floorgate_replay::AuditEventType;
use serde_json::json;
use tracing::{info, instrument, warn};

impl Engine {
    /// Review items passing `filter`, highest priority and oldest first
    pub async fn list_pending_reviews(&self, filter: &ReviewFilter) -> Vec<ReviewItem> {
        self.reviews.list(filter).await
    }

    /// Claim the head of the queue
    #[instrument(skip(self))]
    pub async fn claim_review(&self, reviewer: &str) -> Result<Option<ReviewItem>> {
        match self.reviews.claim(reviewer).await {
            Some(item) => self.persist_claim(item, reviewer).await.map(Some),
            None => Ok(None),
        }
    }

    /// Claim a specific item; `None` when someone else holds it or it is resolved
    #[instrument(skip(self))]
    pub async fn claim_review_by_id(
        &self,
        correlation_id: &str,
        reviewer: &str,
    ) -> Result<Option<ReviewItem>> {
        match self.reviews.claim_by_id(correlation_id, reviewer).await? {
            Some(item) => self.persist_claim(item, reviewer).await.map(Some),
            None => Ok(None),
        }
    }

    async fn persist_claim(&self, item: ReviewItem, reviewer: &str) -> Result<ReviewItem> {
        let id = item.correlation_id.clone();
        let persisted = match self.persistence.save_review(&item).await {
            Ok(()) => {
                self.persistence
                    .record(&id, AuditEventType::Claimed, json!({ "reviewer": reviewer }))
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = persisted {
            self.reviews.release(&id, reviewer).await?;
            return Err(e);
        }
        info!(correlation_id = %id, reviewer, "Review claimed");
        Ok(item)
    }

    /// Hand a claimed item back to the queue
    #[instrument(skip(self))]
    pub async fn release_review(&self, correlation_id: &str, reviewer: &str) -> Result<ReviewItem> {
        let item = self.reviews.release(correlation_id, reviewer).await?;
        self.persistence.save_review(&item).await?;
        self.persistence
            .record(
                correlation_id,
                AuditEventType::Released,
                json!({ "reviewer": reviewer }),
            )
            .await?;
        Ok(item)
    }

    /// Resolve a claimed item
    ///
    /// An `Edit` carries the reviewer's replacement proposal, which is
    /// validated once more against the original request; the result is kept
    /// on the item and the item ends `Edited` whatever that result says.
    #[instrument(skip(self, edited))]
    pub async fn resolve_review(
        &self,
        correlation_id: &str,
        reviewer: &str,
        decision: ReviewDecision,
        edited: Option<LayoutProposal>,
    ) -> Result<ReviewItem> {
        let claimed = self.reviews.ensure_claimed(correlation_id, reviewer).await?;

        let edited = match (decision, edited) {
            (ReviewDecision::Edit, Some(proposal)) => {
                Some(self.revalidate(&claimed, reviewer, proposal).await?)
            }
            (ReviewDecision::Edit, None) => {
                return Err(Error::Review(ReviewError::MissingEditedProposal))
            }
            (_, Some(_)) => return Err(Error::Review(ReviewError::UnexpectedEditedProposal)),
            (_, None) => None,
        };

        let item = self
            .reviews
            .resolve(correlation_id, reviewer, decision, edited)
            .await?;
        if let Err(e) = self.persist_resolution(&item, reviewer, decision).await {
            self.reopen_review(claimed).await;
            return Err(e);
        }

        Ok(item)
    }

    async fn persist_resolution(
        &self,
        item: &ReviewItem,
        reviewer: &str,
        decision: ReviewDecision,
    ) -> Result<()> {
        let id = item.correlation_id.as_str();
        self.persistence.save_review(item).await?;

        let revalidation = item.revalidation.as_ref().map(|r| r.status);
        self.persistence
            .record(
                id,
                AuditEventType::Reviewed,
                json!({
                    "reviewer": reviewer,
                    "decision": decision,
                    "revalidation": revalidation,
                }),
            )
            .await?;
        self.persistence
            .record(
                id,
                AuditEventType::Resolved,
                json!({ "state": item.state, "reviewed": true }),
            )
            .await?;
        Ok(())
    }

    /// Roll an unpersisted resolution back to the reviewer's claim
    async fn reopen_review(&self, claimed: ReviewItem) {
        if let Err(e) = self.persistence.save_review(&claimed).await {
            warn!(
                correlation_id = %claimed.correlation_id,
                error = %e,
                "Could not restore claimed review snapshot"
            );
        }
        self.reviews.reopen(claimed).await;
    }

    async fn revalidate(
        &self,
        item: &ReviewItem,
        reviewer: &str,
        proposal: LayoutProposal,
    ) -> Result<(LayoutProposal, ValidationResult)> {
        let mut proposal = proposal.reissued_by(format!("reviewer:{reviewer}"));
        proposal.used_fallback = false;

        let attempt = item.validation.attempt + 1;
        let outcome = self.pipeline.run(&item.request, &proposal).await;
        let result = self
            .decision
            .decide(&item.correlation_id, attempt, &item.request, outcome);

        self.persistence
            .record(
                &item.correlation_id,
                AuditEventType::Validated,
                json!({
                    "attempt": attempt,
                    "provider": proposal.provider,
                    "status": result.status,
                    "confidence": result.confidence,
                    "reviewer_edit": true,
                }),
            )
            .await?;

        Ok((proposal, result))
    }
}
