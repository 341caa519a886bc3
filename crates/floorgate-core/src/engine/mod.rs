//! Engine - The service exposed to callers
//!
//! Ties intake, the provider chain, the validation pipeline, the decision
//! engine, the review queue and persistence together. One `submit` call is
//! one logical task; the only state shared between concurrent submissions
//! is the persistence layer and the review queue, both guarded per
//! correlation id or per item.

use crate::config::EngineConfig;
use crate::decision::DecisionEngine;
use crate::error::{Error, Result};
use crate::intake::{self, CorrelationLocks};
use crate::orchestrator::ProviderChain;
use crate::persistence::Persistence;
use crate::review::{ReviewQueue, SharedReviewQueue};
use crate::validation::{RuleSetLookup, ValidationPipeline, ValidationResult};
use dashmap::DashMap;
use floorgate_llm::{FallbackGenerator, LayoutProposal, LayoutProvider, LayoutRequest};
use floorgate_replay::{AuditRecord, AuditStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod reviews;
mod submit;
mod types;

pub use types::{LayoutResponse, ReviewHandle};

/// Layout validation and review engine
pub struct Engine {
    chain: ProviderChain,
    pipeline: ValidationPipeline,
    decision: DecisionEngine,
    reviews: SharedReviewQueue,
    persistence: Persistence,
    locks: CorrelationLocks,
    active: Arc<DashMap<String, CancellationToken>>,
}

impl Engine {
    /// Create an engine with no AI providers; add them with `with_provider`
    #[must_use]
    pub fn new(
        config: &EngineConfig,
        fallback: Arc<dyn FallbackGenerator>,
        rules: Arc<dyn RuleSetLookup>,
        store: Arc<dyn AuditStore>,
    ) -> Self {
        Self {
            chain: ProviderChain::new(fallback, &config.orchestrator),
            pipeline: ValidationPipeline::new(&config.validation, rules),
            decision: DecisionEngine::new(config.decision.clone()),
            reviews: Arc::new(ReviewQueue::new()),
            persistence: Persistence::new(store, &config.persistence),
            locks: CorrelationLocks::new(),
            active: Arc::new(DashMap::new()),
        }
    }

    /// Append a provider at the lowest priority
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn LayoutProvider>) -> Self {
        self.chain = self.chain.with_provider(provider);
        self
    }

    /// Provider names in priority order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.chain.provider_names()
    }

    /// Name of the audit store backend
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.persistence.store_name()
    }

    /// The review queue
    #[must_use]
    pub fn review_queue(&self) -> &SharedReviewQueue {
        &self.reviews
    }

    /// Reload persisted review items into the queue
    ///
    /// Items without a stored terminal response belong to submissions that
    /// failed; their snapshots are dropped so the id can be submitted again.
    pub async fn restore(&self) -> Result<usize> {
        let mut items = Vec::new();
        for item in self.persistence.load_reviews().await? {
            if self.persistence.terminal(&item.correlation_id).await?.is_some() {
                items.push(item);
                continue;
            }
            warn!(correlation_id = %item.correlation_id, "Dropping review item of a failed submission");
            self.persistence.delete_review(&item.correlation_id).await?;
        }
        Ok(self.reviews.restore(items).await)
    }

    /// Cancel an in-flight submission
    pub fn cancel(&self, correlation_id: &str) -> bool {
        if let Some((_, token)) = self.active.remove(correlation_id) {
            token.cancel();
            info!(correlation_id, "Submission cancelled");
            true
        } else {
            false
        }
    }

    /// Number of submissions currently being processed
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Every lifecycle event recorded for `correlation_id`, in order
    pub async fn audit_trail(&self, correlation_id: &str) -> Result<Vec<AuditRecord>> {
        let trail = self.persistence.trail(correlation_id).await?;
        if trail.is_empty() {
            return Err(Error::NotFound(correlation_id.to_string()));
        }
        Ok(trail)
    }
}

/// Validate a proposal against a request without providers or persistence
///
/// Runs schema checks, the validation pipeline and the decision engine
/// exactly as a submission would, and returns the result of that single
/// attempt.
pub async fn evaluate_offline(
    config: &EngineConfig,
    rules: Arc<dyn RuleSetLookup>,
    request: &LayoutRequest,
    proposal: &LayoutProposal,
) -> Result<ValidationResult> {
    intake::validate_schema(request)?;
    let correlation_id = request
        .correlation_id
        .as_ref()
        .map_or("offline", |id| id.as_str());

    let pipeline = ValidationPipeline::new(&config.validation, rules);
    let outcome = pipeline.run(request, proposal).await;
    Ok(DecisionEngine::new(config.decision.clone()).decide(correlation_id, 1, request, outcome))
}
