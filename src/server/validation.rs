//! Configuration validation
//!
//! Rejects configurations the engine cannot run safely with and warns
//! about risky deployments.

use super::config::{AppConfig, ProviderConfig};
use anyhow::{bail, Result};
use std::collections::HashSet;
use tracing::warn;

/// Validate configuration before building the engine
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let decision = &config.decision;
    for (name, value) in [
        ("decision.review_threshold", decision.review_threshold),
        (
            "decision.high_confidence_threshold",
            decision.high_confidence_threshold,
        ),
        ("validation.area_tolerance", config.validation.area_tolerance),
    ] {
        if !(0.0..=1.0).contains(&value) {
            bail!("{name} must be within [0, 1], got {value}");
        }
    }
    if decision.high_confidence_threshold < decision.review_threshold {
        bail!("decision.high_confidence_threshold must not be below decision.review_threshold");
    }
    if config.orchestrator.provider_timeout_ms == 0 || config.orchestrator.fallback_timeout_ms == 0
    {
        bail!("orchestrator timeouts must be positive");
    }

    let mut names = HashSet::new();
    for provider in &config.providers {
        if !names.insert(provider.name()) {
            bail!("provider '{}' is configured twice", provider.name());
        }
        if let ProviderConfig::Fixture { name, path } = provider {
            if !std::path::Path::new(path).exists() {
                warn!(provider = %name, path = %path, "Fixture file does not exist yet");
            }
        }
    }

    if !decision.auto_approve_tiers.is_empty() {
        warn!(
            tiers = ?decision.auto_approve_tiers,
            "Auto-approve is enabled: Valid results for these tiers skip human review"
        );
    }

    let is_production = std::env::var("FLOORGATE_ENV")
        .map(|v| v.to_lowercase() == "production")
        .unwrap_or(false);
    if is_production && config.server.host == "0.0.0.0" {
        warn!(
            "SECURITY WARNING: Server is binding to all interfaces (0.0.0.0) in production. \
             Consider binding to 127.0.0.1 and using a reverse proxy."
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::MockMode;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = AppConfig::default();
        config.decision.review_threshold = 0.95;
        assert!(validate_config(&config).is_err());

        config.decision.review_threshold = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_provider_rejected() {
        let mut config = AppConfig::default();
        let mock = ProviderConfig::Mock {
            name: "a".to_string(),
            mode: MockMode::Fail,
        };
        config.providers = vec![mock.clone(), mock];

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }
}
