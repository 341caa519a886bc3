use super::config::OrchestratorConfig;
use crate::error::{Error, Result};
use crate::persistence::Persistence;
use floorgate_llm::{FallbackGenerator, LayoutProposal, LayoutProvider, ProposalRequest};
use floorgate_replay::AuditEventType;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Ranked providers plus the fallback generator
pub struct ProviderChain {
    providers: Vec<Arc<dyn LayoutProvider>>,
    fallback: Arc<dyn FallbackGenerator>,
    provider_timeout: Duration,
    fallback_timeout: Duration,
}

impl ProviderChain {
    /// Create a chain with no providers yet
    #[must_use]
    pub fn new(fallback: Arc<dyn FallbackGenerator>, config: &OrchestratorConfig) -> Self {
        Self {
            providers: Vec::new(),
            fallback,
            provider_timeout: config.provider_timeout(),
            fallback_timeout: config.fallback_timeout(),
        }
    }

    /// Append a provider at the lowest priority
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn LayoutProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Provider names in priority order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Outer budget of one attempt: every provider timeout plus the fallback allotment
    #[must_use]
    pub fn budget(&self) -> Duration {
        let providers = u32::try_from(self.providers.len()).unwrap_or(u32::MAX);
        self.provider_timeout
            .saturating_mul(providers)
            .saturating_add(self.fallback_timeout)
    }

    /// Produce exactly one proposal for the attempt
    #[instrument(skip(self, request, persistence), fields(attempt = request.attempt))]
    pub async fn propose(
        &self,
        correlation_id: &str,
        request: &ProposalRequest,
        persistence: &Persistence,
    ) -> Result<LayoutProposal> {
        let timeout_ms = u64::try_from(self.provider_timeout.as_millis()).unwrap_or(u64::MAX);

        for (rank, provider) in self.providers.iter().enumerate() {
            let name = provider.name();
            persistence
                .record(
                    correlation_id,
                    AuditEventType::ProviderCalled,
                    json!({
                        "provider": name,
                        "rank": rank,
                        "attempt": request.attempt,
                        "timeout_ms": timeout_ms,
                    }),
                )
                .await?;

            let started = Instant::now();
            let error = match tokio::time::timeout(
                self.provider_timeout,
                provider.generate(request, self.provider_timeout),
            )
            .await
            {
                Ok(Ok(mut proposal)) => {
                    if proposal.provider.is_empty() {
                        proposal.provider = name.to_string();
                    }
                    proposal.metadata.latency_ms =
                        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                    info!(provider = name, latency_ms = proposal.metadata.latency_ms, "Provider produced a proposal");
                    return Ok(proposal);
                }
                Ok(Err(e)) => e,
                Err(_) => floorgate_llm::Error::Timeout(timeout_ms),
            };

            warn!(provider = name, error = %error, "Provider failed, falling over");
            persistence
                .record_timed(
                    correlation_id,
                    AuditEventType::ProviderFailed,
                    json!({
                        "provider": name,
                        "error": error.to_string(),
                        "transient": error.is_transient(),
                        "timed_out": matches!(error, floorgate_llm::Error::Timeout(_)),
                    }),
                    started.elapsed(),
                )
                .await?;
        }

        let generator = self.fallback.name();
        let started = Instant::now();
        match self.fallback.generate(&request.layout).await {
            Ok(mut proposal) => {
                proposal.used_fallback = true;
                if proposal.provider.is_empty() {
                    proposal.provider = generator.to_string();
                }
                warn!(generator, providers = self.providers.len(), "Every provider failed, using fallback");
                persistence
                    .record_timed(
                        correlation_id,
                        AuditEventType::FallbackUsed,
                        json!({
                            "generator": generator,
                            "providers_tried": self.providers.len(),
                        }),
                        started.elapsed(),
                    )
                    .await?;
                Ok(proposal)
            }
            Err(e) => {
                persistence
                    .record_timed(
                        correlation_id,
                        AuditEventType::ProviderFailed,
                        json!({
                            "provider": generator,
                            "error": e.to_string(),
                            "fallback": true,
                        }),
                        started.elapsed(),
                    )
                    .await?;
                Err(Error::ProviderChainExhausted(format!(
                    "{} provider(s) and fallback '{}' failed: {}",
                    self.providers.len(),
                    generator,
                    e
                )))
            }
        }
    }
}
