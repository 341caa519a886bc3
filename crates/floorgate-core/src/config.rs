//! Engine configuration
//!
//! One struct per component, each deserialisable on its own with serde
//! defaults, gathered here so the binary can flatten them into its
//! application config.

use crate::decision::DecisionPolicy;
use crate::orchestrator::OrchestratorConfig;
use crate::persistence::PersistenceConfig;
use crate::validation::ValidationConfig;
use serde::{Deserialize, Serialize};

/// Configuration of the whole engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Provider chain timeouts
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Validator bounds and confidence weights
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Decision thresholds and auto-approve tiers
    #[serde(default)]
    pub decision: DecisionPolicy,
    /// Store retry policy
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl EngineConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set orchestrator timeouts
    #[must_use]
    pub fn with_orchestrator(mut self, orchestrator: OrchestratorConfig) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    /// Set validation settings
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Set the decision policy
    #[must_use]
    pub fn with_decision(mut self, decision: DecisionPolicy) -> Self {
        self.decision = decision;
        self
    }

    /// Set the persistence retry policy
    #[must_use]
    pub fn with_persistence(mut self, persistence: PersistenceConfig) -> Self {
        self.persistence = persistence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"decision": {"review_threshold": 0.8, "auto_approve_tiers": ["enterprise"]}}"#,
        )
        .unwrap();

        assert_eq!(config.decision.review_threshold, 0.8);
        assert_eq!(config.decision.high_confidence_threshold, 0.9);
        assert!(config.decision.auto_approves(Some("Enterprise")));
        assert_eq!(config.orchestrator.provider_timeout_ms, 30_000);
        assert_eq!(config.validation.area_tolerance, 0.10);
        assert_eq!(config.persistence.max_attempts, 3);
    }
}
