//! Fixture provider
//!
//! Replays a recorded proposal from a JSON file. Lets operators run the
//! whole pipeline against known model output without any network client.

use crate::error::{Error, Result};
use crate::proposal::LayoutProposal;
use crate::provider::{LayoutProvider, ProposalRequest};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// Provider backed by a proposal JSON file
pub struct FixtureProvider {
    name: String,
    path: PathBuf,
}

impl FixtureProvider {
    /// Create a provider reading `path` on every call
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[async_trait::async_trait]
impl LayoutProvider for FixtureProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: &ProposalRequest,
        _timeout: Duration,
    ) -> Result<LayoutProposal> {
        let started = Instant::now();
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::NotConfigured(format!("{}: {e}", self.path.display())))?;

        let recorded: LayoutProposal =
            serde_json::from_str(&raw).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        let mut proposal = recorded.reissued_by(&self.name);
        proposal.metadata.latency_ms = started.elapsed().as_millis() as u64;

        debug!(
            provider = %self.name,
            attempt = request.attempt,
            rooms = proposal.rooms.len(),
            "Loaded fixture proposal"
        );
        Ok(proposal)
    }
}
