//! Confidence scorer
//!
//! The score is a pure function of the provider's self-reported confidence
//! and the finding list: same inputs, same score.

use super::types::{Severity, ValidationError};
use serde::{Deserialize, Serialize};

/// Tunable scoring weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    /// Base used when the provider reports no confidence
    #[serde(default = "default_base")]
    pub default_confidence: f64,
    /// Subtracted per `error` finding
    #[serde(default = "default_error_penalty")]
    pub error_penalty: f64,
    /// Subtracted per `warning` finding
    #[serde(default = "default_warning_penalty")]
    pub warning_penalty: f64,
    /// Ceiling applied when any `critical` finding exists
    #[serde(default = "default_critical_cap")]
    pub critical_cap: f64,
}

fn default_base() -> f64 {
    0.85
}
fn default_error_penalty() -> f64 {
    0.15
}
fn default_warning_penalty() -> f64 {
    0.05
}
fn default_critical_cap() -> f64 {
    0.3
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            default_confidence: default_base(),
            error_penalty: default_error_penalty(),
            warning_penalty: default_warning_penalty(),
            critical_cap: default_critical_cap(),
        }
    }
}

/// Combines provider confidence with the other validators' findings
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    weights: ConfidenceWeights,
}

impl ConfidenceScorer {
    /// Create a scorer
    #[must_use]
    pub fn new(weights: ConfidenceWeights) -> Self {
        Self { weights }
    }

    /// Aggregate score in [0, 1]
    #[must_use]
    pub fn score(&self, provider_confidence: Option<f64>, findings: &[ValidationError]) -> f64 {
        let w = &self.weights;
        let base = provider_confidence
            .filter(|c| c.is_finite())
            .unwrap_or(w.default_confidence)
            .clamp(0.0, 1.0);

        let (mut errors, mut warnings, mut critical) = (0u32, 0u32, false);
        for finding in findings {
            match finding.severity {
                Severity::Critical => critical = true,
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => {}
            }
        }

        let mut score =
            base - w.error_penalty * f64::from(errors) - w.warning_penalty * f64::from(warnings);
        if critical {
            score = score.min(w.critical_cap);
        }
        score.clamp(0.0, 1.0)
    }

    /// Informational findings about the score inputs; they carry no weight
    #[must_use]
    pub fn notes(&self, provider_confidence: Option<f64>) -> Vec<ValidationError> {
        match provider_confidence {
            None => vec![ValidationError::new(
                "CONF_NOT_REPORTED",
                Severity::Info,
                "confidence",
                format!(
                    "provider reported no confidence, using {:.2}",
                    self.weights.default_confidence
                ),
            )],
            Some(c) if !(0.0..=1.0).contains(&c) => vec![ValidationError::new(
                "CONF_OUT_OF_RANGE",
                Severity::Info,
                "confidence",
                format!("provider confidence {c} was clamped to [0, 1]"),
            )],
            Some(_) => Vec::new(),
        }
    }
}
