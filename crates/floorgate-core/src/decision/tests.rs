use super::*;
use crate::validation::ValidationError;
use floorgate_llm::{AiOptions, LayoutRequest};

fn outcome(severities: &[Severity], confidence: f64, used_fallback: bool) -> PipelineOutcome {
    PipelineOutcome {
        findings: severities
            .iter()
            .map(|s| ValidationError::new("X", *s, "p", "m"))
            .collect(),
        confidence,
        used_fallback,
    }
}

fn engine() -> DecisionEngine {
    DecisionEngine::default()
}

#[test]
fn test_rules_in_order() {
    let e = engine();
    use Severity as S;
    use ValidationStatus as V;

    // rule 1
    assert_eq!(e.classify(&outcome(&[S::Critical], 0.3, false), 0.7), V::RequiresManualReview);
    assert_eq!(e.classify(&outcome(&[S::Critical; 2], 0.3, false), 0.7), V::RequiresManualReview);
    assert_eq!(e.classify(&outcome(&[S::Critical; 3], 0.0, false), 0.7), V::Rejected);
    assert_eq!(e.classify(&outcome(&[], 0.99, true), 0.7), V::RequiresManualReview);
    // rule 2
    assert_eq!(e.classify(&outcome(&[], 0.5, false), 0.7), V::RequiresManualReview);
    // rule 3
    assert_eq!(e.classify(&outcome(&[S::Error], 0.8, false), 0.7), V::InvalidButCorrectable);
    // rule 4
    assert_eq!(e.classify(&outcome(&[S::Warning, S::Info], 0.9, false), 0.7), V::Valid);
    // rule 5
    assert_eq!(e.classify(&outcome(&[], 0.8, false), 0.7), V::RequiresManualReview);
}

#[test]
fn test_fallback_never_valid() {
    let e = engine();
    for confidence in [0.0, 0.5, 0.9, 1.0] {
        let status = e.classify(&outcome(&[], confidence, true), 0.7);
        assert_ne!(status, ValidationStatus::Valid);
    }
}

#[test]
fn test_review_forced_without_auto_approve() {
    let e = DecisionEngine::new(DecisionPolicy::default().with_auto_approve_tier("enterprise"));

    for status in [
        ValidationStatus::Valid,
        ValidationStatus::InvalidButCorrectable,
        ValidationStatus::RequiresManualReview,
        ValidationStatus::Rejected,
    ] {
        assert!(e.requires_human_review(None, status));
        assert!(e.requires_human_review(Some("free"), status));
    }

    assert!(!e.requires_human_review(Some("Enterprise"), ValidationStatus::Valid));
    assert!(e.requires_human_review(Some("enterprise"), ValidationStatus::Rejected));
}

#[test]
fn test_caller_threshold_only_tightens() {
    let e = engine();
    let mut request = LayoutRequest::new("t", "us");
    assert_eq!(e.review_threshold(&request), 0.7);

    request.ai_options = AiOptions {
        confidence_threshold: Some(0.8),
        ..AiOptions::default()
    };
    assert_eq!(e.review_threshold(&request), 0.8);

    request.ai_options.confidence_threshold = Some(0.1);
    assert_eq!(e.review_threshold(&request), 0.7);
}

#[test]
fn test_decide_splits_findings() {
    let e = engine();
    let request = LayoutRequest::new("t", "us");
    let result = e.decide(
        "corr",
        1,
        &request,
        outcome(&[Severity::Error, Severity::Warning, Severity::Info], 0.8, false),
    );

    assert_eq!(result.status, ValidationStatus::InvalidButCorrectable);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.warnings.len(), 2);
    assert!(result.requires_human_review);
    assert_eq!(result.correction_hints().len(), 1);
}

#[test]
fn test_attempt_transitions() {
    let state = AttemptState::Pending;
    let state = state.transition(AttemptState::Validating).unwrap();
    let state = state
        .transition(AttemptState::Decided(ValidationStatus::Valid))
        .unwrap();
    assert!(state.is_terminal());

    assert!(state.transition(AttemptState::Validating).is_err());
    assert!(AttemptState::Pending
        .transition(AttemptState::Decided(ValidationStatus::Rejected))
        .is_err());
}
