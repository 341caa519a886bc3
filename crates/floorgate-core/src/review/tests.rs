use super::*;
use crate::validation::{Severity, ValidationError, ValidationResult, ValidationStatus};
use chrono::Utc;
use floorgate_llm::{LayoutProposal, LayoutRequest};
use std::sync::Arc;

fn result(id: &str, status: ValidationStatus, errors: &[Severity], confidence: f64) -> ValidationResult {
    ValidationResult {
        correlation_id: id.to_string(),
        attempt: 1,
        status,
        errors: errors
            .iter()
            .map(|s| ValidationError::new("X", *s, "p", "m"))
            .collect(),
        warnings: Vec::new(),
        confidence,
        requires_human_review: true,
        used_fallback: false,
        timestamp: Utc::now(),
    }
}

fn item(id: &str, status: ValidationStatus, errors: &[Severity], confidence: f64) -> ReviewItem {
    ReviewItem::new(
        LayoutRequest::new("t", "us"),
        LayoutProposal::new("p"),
        result(id, status, errors, confidence),
    )
}

fn low(id: &str) -> ReviewItem {
    item(id, ValidationStatus::RequiresManualReview, &[], 0.8)
}

#[test]
fn test_priority_derivation() {
    use ValidationStatus as V;

    assert_eq!(item("a", V::Rejected, &[], 0.9).priority, ReviewPriority::Critical);
    assert_eq!(
        item("a", V::RequiresManualReview, &[Severity::Critical], 0.3).priority,
        ReviewPriority::Critical
    );
    assert_eq!(item("a", V::RequiresManualReview, &[], 0.4).priority, ReviewPriority::High);
    assert_eq!(
        item("a", V::InvalidButCorrectable, &[Severity::Error], 0.8).priority,
        ReviewPriority::Normal
    );
    assert_eq!(low("a").priority, ReviewPriority::Low);

    let mut fallback = result("a", V::RequiresManualReview, &[], 0.9);
    fallback.used_fallback = true;
    assert_eq!(ReviewPriority::from_result(&fallback), ReviewPriority::High);
}

#[tokio::test]
async fn test_priority_then_fifo() {
    let queue = ReviewQueue::new();
    queue.enqueue(low("low-1")).await.unwrap();
    queue
        .enqueue(item("crit", ValidationStatus::Rejected, &[Severity::Critical; 3], 0.0))
        .await
        .unwrap();
    queue.enqueue(low("low-2")).await.unwrap();
    queue
        .enqueue(item("normal", ValidationStatus::InvalidButCorrectable, &[Severity::Error], 0.8))
        .await
        .unwrap();

    let order: Vec<_> = queue
        .list(&ReviewFilter::pending())
        .await
        .into_iter()
        .map(|i| i.correlation_id)
        .collect();
    assert_eq!(order, vec!["crit", "normal", "low-1", "low-2"]);

    assert_eq!(queue.claim("r").await.unwrap().correlation_id, "crit");
    assert_eq!(queue.claim("r").await.unwrap().correlation_id, "normal");
    assert_eq!(queue.claim("r").await.unwrap().correlation_id, "low-1");
    assert_eq!(queue.pending_count().await, 1);
}

#[tokio::test]
async fn test_duplicate_enqueue_rejected() {
    let queue = ReviewQueue::new();
    queue.enqueue(low("a")).await.unwrap();

    let err = queue.enqueue(low("a")).await.unwrap_err();
    assert_eq!(err, ReviewError::AlreadyQueued("a".to_string()));
}

#[tokio::test]
async fn test_claimed_item_is_invisible() {
    let queue = ReviewQueue::new();
    queue.enqueue(low("a")).await.unwrap();

    let claimed = queue.claim("alice").await.unwrap();
    assert_eq!(claimed.state, ReviewState::InReview);
    assert_eq!(claimed.reviewer.as_deref(), Some("alice"));

    assert!(queue.claim("bob").await.is_none());
    assert!(queue.claim_by_id("a", "bob").await.unwrap().is_none());
    assert!(queue.list(&ReviewFilter::pending()).await.is_empty());
}

#[tokio::test]
async fn test_concurrent_claims_on_same_item() {
    let queue = Arc::new(ReviewQueue::new());
    queue.enqueue(low("contested")).await.unwrap();

    let handles: Vec<_> = ["alice", "bob"]
        .into_iter()
        .map(|reviewer| {
            let queue = queue.clone();
            tokio::spawn(async move { queue.claim_by_id("contested", reviewer).await })
        })
        .collect();

    let mut winners = 0;
    let mut losers = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            Some(_) => winners += 1,
            None => losers += 1,
        }
    }
    assert_eq!((winners, losers), (1, 1));
}

#[tokio::test]
async fn test_release_keeps_position() {
    let queue = ReviewQueue::new();
    queue.enqueue(low("first")).await.unwrap();
    queue.enqueue(low("second")).await.unwrap();

    queue.claim("alice").await.unwrap();
    let err = queue.release("first", "bob").await.unwrap_err();
    assert!(matches!(err, ReviewError::NotClaimedBy { .. }));

    let released = queue.release("first", "alice").await.unwrap();
    assert_eq!(released.state, ReviewState::Pending);
    assert!(released.reviewer.is_none());

    assert_eq!(queue.claim("carol").await.unwrap().correlation_id, "first");
}

#[tokio::test]
async fn test_resolve_requires_claim_and_matching_payload() {
    let queue = ReviewQueue::new();
    queue.enqueue(low("a")).await.unwrap();

    let err = queue
        .resolve("a", "alice", ReviewDecision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::NotClaimedBy { .. }));

    queue.claim("alice").await.unwrap();

    let err = queue
        .resolve("a", "alice", ReviewDecision::Edit, None)
        .await
        .unwrap_err();
    assert_eq!(err, ReviewError::MissingEditedProposal);

    let edit = (
        LayoutProposal::new("reviewer"),
        result("a", ValidationStatus::Valid, &[], 0.95),
    );
    let err = queue
        .resolve("a", "alice", ReviewDecision::Approve, Some(edit))
        .await
        .unwrap_err();
    assert_eq!(err, ReviewError::UnexpectedEditedProposal);

    let resolved = queue
        .resolve("a", "alice", ReviewDecision::Approve, None)
        .await
        .unwrap();
    assert_eq!(resolved.state, ReviewState::Approved);
    assert!(resolved.decided_at.is_some());

    let err = queue
        .resolve("a", "alice", ReviewDecision::Reject, None)
        .await
        .unwrap_err();
    assert_eq!(err, ReviewError::AlreadyResolved("a".to_string()));
}

#[tokio::test]
async fn test_edit_stores_revalidation() {
    let queue = ReviewQueue::new();
    queue.enqueue(low("a")).await.unwrap();
    queue.claim("alice").await.unwrap();

    let edited = LayoutProposal::new("alice");
    let revalidation = result("a", ValidationStatus::Valid, &[], 0.95);
    let resolved = queue
        .resolve(
            "a",
            "alice",
            ReviewDecision::Edit,
            Some((edited.clone(), revalidation.clone())),
        )
        .await
        .unwrap();

    assert_eq!(resolved.state, ReviewState::Edited);
    assert_eq!(resolved.edited_proposal, Some(edited));
    assert_eq!(resolved.revalidation, Some(revalidation));
}

#[tokio::test]
async fn test_reopen_returns_resolved_item_to_its_reviewer() {
    let queue = ReviewQueue::new();
    queue.enqueue(low("r-1")).await.unwrap();
    let claimed = queue.claim("ivy").await.unwrap();
    queue
        .resolve("r-1", "ivy", ReviewDecision::Reject, None)
        .await
        .unwrap();

    queue.reopen(claimed).await;

    let item = queue.get("r-1").await.unwrap();
    assert_eq!(item.state, ReviewState::InReview);
    assert_eq!(queue.pending_count().await, 0);
    let resolved = queue
        .resolve("r-1", "ivy", ReviewDecision::Approve, None)
        .await
        .unwrap();
    assert_eq!(resolved.state, ReviewState::Approved);
}

#[tokio::test]
async fn test_restore_rebuilds_order() {
    let source = ReviewQueue::new();
    source.enqueue(low("a")).await.unwrap();
    source.enqueue(low("b")).await.unwrap();
    source.claim("alice").await.unwrap();
    let snapshot = source.list(&ReviewFilter::default()).await;

    let queue = ReviewQueue::new();
    assert_eq!(queue.restore(snapshot).await, 2);
    assert_eq!(queue.pending_count().await, 1);

    let next = queue.enqueue(low("c")).await.unwrap();
    assert_eq!(next.sequence, 2);
    assert_eq!(queue.get("a").await.unwrap().state, ReviewState::InReview);
    assert_eq!(queue.claim("bob").await.unwrap().correlation_id, "b");
}

#[test]
fn test_filter_and_parsing() {
    let mut claimed = low("a");
    claimed.state = ReviewState::InReview;
    claimed.reviewer = Some("alice".to_string());

    let by_reviewer = ReviewFilter {
        reviewer: Some("alice".to_string()),
        ..ReviewFilter::default()
    };
    assert!(by_reviewer.matches(&claimed));
    assert!(!ReviewFilter::pending().matches(&claimed));

    assert_eq!("in_review".parse::<ReviewState>().unwrap(), ReviewState::InReview);
    assert_eq!("Approve".parse::<ReviewDecision>().unwrap(), ReviewDecision::Approve);
    assert!("maybe".parse::<ReviewDecision>().is_err());
    assert_eq!("high".parse::<ReviewPriority>().unwrap(), ReviewPriority::High);
    assert!("urgent".parse::<ReviewPriority>().is_err());
}
