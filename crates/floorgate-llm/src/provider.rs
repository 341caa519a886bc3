//! Provider capabilities
//!
//! Every AI backend is one small adapter implementing `LayoutProvider`.
//! The engine only ever sees the trait objects, ranked by configuration.

use crate::error::Result;
use crate::proposal::LayoutProposal;
use crate::request::LayoutRequest;
use std::time::Duration;

/// Input handed to a provider for one generation call
#[derive(Debug, Clone)]
pub struct ProposalRequest {
    /// The accepted request (correlation id already assigned)
    pub layout: LayoutRequest,
    /// Findings from a previous attempt, set on the correction pass
    pub correction_hints: Vec<String>,
    /// 1 for the first attempt, 2 for the correction pass
    pub attempt: u32,
}

impl ProposalRequest {
    /// First attempt for a request
    #[must_use]
    pub fn first(layout: LayoutRequest) -> Self {
        Self {
            layout,
            correction_hints: Vec::new(),
            attempt: 1,
        }
    }

    /// Correction attempt carrying the previous findings as hints
    #[must_use]
    pub fn correction(layout: LayoutRequest, hints: Vec<String>) -> Self {
        Self {
            layout,
            correction_hints: hints,
            attempt: 2,
        }
    }
}

/// Trait for AI layout providers
#[async_trait::async_trait]
pub trait LayoutProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Generate a proposal.
    ///
    /// `timeout` is advisory for the adapter (e.g. an HTTP client deadline);
    /// the orchestrator enforces it independently.
    async fn generate(&self, request: &ProposalRequest, timeout: Duration)
        -> Result<LayoutProposal>;
}

/// Trait for the deterministic, non-AI generator used when every provider failed
#[async_trait::async_trait]
pub trait FallbackGenerator: Send + Sync {
    /// Get the generator name
    fn name(&self) -> &str;

    /// Generate a proposal from the request alone
    async fn generate(&self, request: &LayoutRequest) -> Result<LayoutProposal>;
}
