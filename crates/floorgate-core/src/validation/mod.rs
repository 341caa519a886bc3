//! Validation - Independent checks over a normalized proposal
//!
//! The geometry, spatial and regulatory validators only read the layout, so
//! they run concurrently. Their findings are merged in validator order with
//! no deduplication, then the confidence scorer turns the merged list into
//! the aggregate score.

use floorgate_llm::{LayoutProposal, LayoutRequest};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

pub mod confidence;
pub mod geometry;
pub mod normalize;
pub mod regulatory;
pub mod rules;
pub mod spatial;
pub mod types;

pub use confidence::{ConfidenceScorer, ConfidenceWeights};
pub use geometry::{GeometryBounds, GeometryValidator};
pub use normalize::NormalizedLayout;
pub use regulatory::RegulatoryValidator;
pub use rules::{RuleSet, RuleSetLookup, StaticRuleBook};
pub use spatial::SpatialValidator;
pub use types::{PipelineOutcome, Severity, ValidationError, ValidationResult, ValidationStatus};

/// One independent check
#[async_trait::async_trait]
pub trait Validator: Send + Sync {
    /// Name stamped on every finding
    fn name(&self) -> &'static str;

    /// Findings for the layout; an empty list means the check passed
    async fn validate(&self, layout: &NormalizedLayout) -> Vec<ValidationError>;
}

/// Validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Geometry bounds
    #[serde(default)]
    pub geometry: GeometryBounds,
    /// Allowed relative deviation of total room area from the program
    #[serde(default = "default_area_tolerance")]
    pub area_tolerance: f64,
    /// Collinearity tolerance for shared walls
    #[serde(default = "default_adjacency_tolerance_mm")]
    pub adjacency_tolerance_mm: f64,
    /// Confidence weights
    #[serde(default)]
    pub confidence: ConfidenceWeights,
}

fn default_area_tolerance() -> f64 {
    0.10
}

fn default_adjacency_tolerance_mm() -> f64 {
    1.0
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryBounds::default(),
            area_tolerance: default_area_tolerance(),
            adjacency_tolerance_mm: default_adjacency_tolerance_mm(),
            confidence: ConfidenceWeights::default(),
        }
    }
}

/// Runs every validator and the confidence scorer
pub struct ValidationPipeline {
    validators: Vec<Arc<dyn Validator>>,
    scorer: ConfidenceScorer,
}

impl ValidationPipeline {
    /// The standard pipeline: geometry, spatial, regulatory, confidence
    #[must_use]
    pub fn new(config: &ValidationConfig, rules: Arc<dyn RuleSetLookup>) -> Self {
        Self {
            validators: vec![
                Arc::new(GeometryValidator::new(config.geometry.clone())),
                Arc::new(SpatialValidator::new(
                    config.area_tolerance,
                    config.adjacency_tolerance_mm,
                )),
                Arc::new(RegulatoryValidator::new(rules)),
            ],
            scorer: ConfidenceScorer::new(config.confidence.clone()),
        }
    }

    /// Add a validator after the standard ones
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Normalize the proposal and run every check
    #[instrument(skip_all, fields(provider = %proposal.provider))]
    pub async fn run(&self, request: &LayoutRequest, proposal: &LayoutProposal) -> PipelineOutcome {
        let layout = NormalizedLayout::from_proposal(request, proposal);

        let runs = self.validators.iter().map(|validator| {
            let layout = &layout;
            async move {
                let mut findings = validator.validate(layout).await;
                for finding in &mut findings {
                    finding.validator = validator.name().to_string();
                }
                findings
            }
        });
        let mut findings: Vec<ValidationError> = join_all(runs).await.into_iter().flatten().collect();

        let confidence = self.scorer.score(layout.provider_confidence, &findings);
        findings.extend(
            self.scorer
                .notes(layout.provider_confidence)
                .into_iter()
                .map(|mut note| {
                    note.validator = "confidence".to_string();
                    note
                }),
        );

        debug!(findings = findings.len(), confidence, "Validation complete");
        PipelineOutcome {
            findings,
            confidence,
            used_fallback: layout.used_fallback,
        }
    }
}
