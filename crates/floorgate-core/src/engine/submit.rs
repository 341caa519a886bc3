//! Submission flow

use super::{Engine, LayoutResponse, ReviewHandle};
use crate::decision::AttemptState;
use crate::error::{Error, Result};
use crate::intake;
use crate::review::ReviewItem;
use crate::validation::{ValidationResult, ValidationStatus};
use chrono::Utc;
use floorgate_llm::{LayoutProposal, LayoutRequest, ProposalRequest};
use floorgate_replay::AuditEventType;
use serde_json::json;
use std::future::Future;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

impl Engine {
    /// Submit a layout request
    ///
    /// Returns once the response is terminal and stored. Queued responses
    /// come back immediately with their review handle; poll them with
    /// `get_status`.
    pub async fn submit(&self, request: LayoutRequest) -> Result<LayoutResponse> {
        self.submit_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Submit with a caller-owned cancellation token
    ///
    /// Cancelling aborts the in-flight provider call. Audit events already
    /// recorded stay recorded.
    #[instrument(skip_all, fields(region = %request.region))]
    pub async fn submit_with_cancel(
        &self,
        request: LayoutRequest,
        cancel: CancellationToken,
    ) -> Result<LayoutResponse> {
        let (correlation_id, request) = intake::accept(request)?;
        let id = correlation_id.to_string();

        let _guard = self.locks.acquire(&id).await;
        if let Some(stored) = self.persistence.terminal(&id).await? {
            debug!(correlation_id = %id, "Returning stored terminal response");
            return decode(&stored);
        }

        self.active.insert(id.clone(), cancel.clone());
        let result = self.process(&id, &request, &cancel).await;
        self.active.remove(&id);

        if let Err(e) = &result {
            warn!(correlation_id = %id, error = %e, "Submission failed");
        }
        result
    }

    /// Current response for a correlation id, with live review state
    pub async fn get_status(&self, correlation_id: &str) -> Result<LayoutResponse> {
        match self.persistence.terminal(correlation_id).await? {
            Some(stored) => {
                let mut response = decode(&stored)?;
                if let Some(item) = self.reviews.get(correlation_id).await {
                    response.review = Some(ReviewHandle::from(&item));
                }
                Ok(response)
            }
            None if self.active.contains_key(correlation_id) || self.locks.is_held(correlation_id) => {
                Err(Error::InProgress(correlation_id.to_string()))
            }
            None => Err(Error::NotFound(correlation_id.to_string())),
        }
    }

    async fn process(
        &self,
        id: &str,
        request: &LayoutRequest,
        cancel: &CancellationToken,
    ) -> Result<LayoutResponse> {
        let started = Instant::now();
        self.persistence
            .record(
                id,
                AuditEventType::Submitted,
                json!({
                    "region": request.region,
                    "measurement_system": request.measurement_system,
                    "rooms": request.rooms.len(),
                    "tier": request.tier,
                    "request_correction": request.ai_options.request_correction,
                }),
            )
            .await?;

        let first = ProposalRequest::first(request.clone());
        let (mut proposal, mut validation) = self
            .bounded(id, cancel, self.attempt(id, request, &first))
            .await?;
        let mut attempts = 1;

        if validation.status == ValidationStatus::InvalidButCorrectable
            && request.ai_options.request_correction
        {
            let hints = validation.correction_hints();
            self.persistence
                .record(
                    id,
                    AuditEventType::CorrectionRequested,
                    json!({ "attempt": 2, "hints": hints }),
                )
                .await?;

            let correction = ProposalRequest::correction(request.clone(), hints);
            (proposal, validation) = self
                .bounded(id, cancel, self.attempt(id, request, &correction))
                .await?;
            attempts = 2;
        }

        let review = if validation.requires_human_review {
            Some(self.queue(request, &proposal, &validation).await?)
        } else {
            self.persistence
                .record(
                    id,
                    AuditEventType::Resolved,
                    json!({ "status": validation.status, "reviewed": false }),
                )
                .await?;
            None
        };

        let response = LayoutResponse {
            correlation_id: id.to_string(),
            status: validation.status,
            requires_human_review: validation.requires_human_review,
            validation,
            proposal,
            attempts,
            review,
            created_at: Utc::now(),
        };

        let stored = match self.store_response(id, &response).await {
            Ok(stored) => stored,
            Err(e) => {
                if response.review.is_some() {
                    self.abandon_review(id).await;
                }
                return Err(e);
            }
        };

        info!(
            correlation_id = id,
            status = %response.status,
            attempts,
            queued = response.review.is_some(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Submission complete"
        );
        decode(&stored)
    }

    /// One attempt: propose, validate, decide
    async fn attempt(
        &self,
        id: &str,
        request: &LayoutRequest,
        proposal_request: &ProposalRequest,
    ) -> Result<(LayoutProposal, ValidationResult)> {
        let state = AttemptState::Pending;
        let proposal = self
            .chain
            .propose(id, proposal_request, &self.persistence)
            .await?;

        let state = state.transition(AttemptState::Validating)?;
        let started = Instant::now();
        let outcome = self.pipeline.run(request, &proposal).await;
        self.persistence
            .record_timed(
                id,
                AuditEventType::Validated,
                json!({
                    "attempt": proposal_request.attempt,
                    "provider": proposal.provider,
                    "findings": outcome.findings.len(),
                    "confidence": outcome.confidence,
                    "used_fallback": outcome.used_fallback,
                }),
                started.elapsed(),
            )
            .await?;

        let validation = self
            .decision
            .decide(id, proposal_request.attempt, request, outcome);
        state.transition(AttemptState::Decided(validation.status))?;
        self.persistence
            .record(
                id,
                AuditEventType::Decided,
                json!({
                    "attempt": proposal_request.attempt,
                    "status": validation.status,
                    "confidence": validation.confidence,
                    "requires_human_review": validation.requires_human_review,
                    "errors": validation.errors.len(),
                    "warnings": validation.warnings.len(),
                }),
            )
            .await?;

        Ok((proposal, validation))
    }

    /// Run one attempt under the outer budget and the caller's cancellation
    async fn bounded<T>(
        &self,
        id: &str,
        cancel: &CancellationToken,
        attempt: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let budget = self.chain.budget();
        let budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.persistence
                    .record(id, AuditEventType::Cancelled, json!({}))
                    .await?;
                Err(Error::Cancelled(id.to_string()))
            }
            outcome = tokio::time::timeout(budget, attempt) => match outcome {
                Ok(result) => result,
                Err(_) => {
                    self.persistence
                        .record(id, AuditEventType::TimedOut, json!({ "budget_ms": budget_ms }))
                        .await?;
                    Err(Error::Timeout {
                        correlation_id: id.to_string(),
                        budget_ms,
                    })
                }
            },
        }
    }

    /// Enqueue for review; the item is dropped again if it cannot be persisted
    async fn queue(
        &self,
        request: &LayoutRequest,
        proposal: &LayoutProposal,
        validation: &ValidationResult,
    ) -> Result<ReviewHandle> {
        let id = validation.correlation_id.as_str();
        let item = self
            .reviews
            .enqueue(ReviewItem::new(
                request.clone(),
                proposal.clone(),
                validation.clone(),
            ))
            .await?;

        let persisted = match self.persistence.save_review(&item).await {
            Ok(()) => {
                self.persistence
                    .record(
                        id,
                        AuditEventType::Queued,
                        json!({
                            "priority": item.priority,
                            "status": validation.status,
                        }),
                    )
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = persisted {
            self.abandon_review(id).await;
            return Err(e);
        }
        Ok(ReviewHandle::from(&item))
    }

    async fn store_response(&self, id: &str, response: &LayoutResponse) -> Result<String> {
        let encoded =
            serde_json::to_string(response).map_err(|e| Error::Internal(e.to_string()))?;
        self.persistence.store_terminal(id, &encoded).await
    }

    /// Forget a review item whose submission failed, so the id can be retried
    async fn abandon_review(&self, id: &str) {
        self.reviews.discard(id).await;
        if let Err(e) = self.persistence.delete_review(id).await {
            warn!(correlation_id = id, error = %e, "Could not delete abandoned review snapshot");
        }
    }
}

fn decode(stored: &str) -> Result<LayoutResponse> {
    serde_json::from_str(stored).map_err(|e| Error::Internal(format!("corrupt terminal response: {e}")))
}
