//! Orchestrator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts of the provider chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Independent timeout of each provider call
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,
    /// Time allotted to the fallback generator within the outer budget
    #[serde(default = "default_fallback_timeout_ms")]
    pub fallback_timeout_ms: u64,
}

fn default_provider_timeout_ms() -> u64 {
    30_000
}

fn default_fallback_timeout_ms() -> u64 {
    5_000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: default_provider_timeout_ms(),
            fallback_timeout_ms: default_fallback_timeout_ms(),
        }
    }
}

impl OrchestratorConfig {
    /// Set both timeouts
    #[must_use]
    pub fn with_timeouts(mut self, provider: Duration, fallback: Duration) -> Self {
        self.provider_timeout_ms = u64::try_from(provider.as_millis()).unwrap_or(u64::MAX);
        self.fallback_timeout_ms = u64::try_from(fallback.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Per-provider timeout
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Fallback allotment
    #[must_use]
    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }
}
