use super::*;
use axum::body::Body;
use axum::http::{Method, Request};
use floorgate_core::{EngineConfig, RuleSet, StaticRuleBook};
use floorgate_llm::StripFallbackGenerator;
use floorgate_replay::MemoryAuditStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Fallback-only engine: every submission lands on the review queue
fn router() -> Router {
    let engine = floorgate_core::Engine::new(
        &EngineConfig::default(),
        Arc::new(StripFallbackGenerator::new()),
        Arc::new(StaticRuleBook::new([RuleSet::new("test").with_min_room_area(4.0)])),
        Arc::new(MemoryAuditStore::new()),
    );
    crate::server::app(Arc::new(engine))
}

fn layout_request(id: &str) -> Value {
    json!({
        "correlation_id": id,
        "description": "studio",
        "rooms": [
            {"name": "Living", "required_area": 20.0},
            {"name": "Bath", "required_area": 5.0, "adjacent_to": ["Living"]}
        ],
        "region": "test",
        "measurement_system": "metric"
    })
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health() {
    let router = router();

    let (status, body) = call(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = call(&router, Method::GET, "/health/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["pending_reviews"], 0);
}

#[tokio::test]
async fn test_submit_then_poll() {
    let router = router();

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/layouts",
        Some(layout_request("api-1")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["correlation_id"], "api-1");
    assert_eq!(body["data"]["requires_human_review"], true);
    assert_eq!(body["data"]["review"]["state"], "pending");

    let (status, body) = call(&router, Method::GET, "/api/v1/layouts/api-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["correlation_id"], "api-1");

    let (status, body) = call(&router, Method::GET, "/api/v1/layouts/api-1/audit", None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"].as_array().unwrap();
    assert_eq!(events[0]["event_type"], "submitted");
    assert_eq!(events[0]["sequence_num"], 1);
    assert!(events.iter().any(|e| e["event_type"] == "fallback_used"));
}

#[tokio::test]
async fn test_unknown_layout_is_not_found() {
    let router = router();

    let (status, body) = call(&router, Method::GET, "/api/v1/layouts/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = call(&router, Method::GET, "/api/v1/layouts/missing/audit", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&router, Method::POST, "/api/v1/layouts/missing/cancel", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_request_is_bad_request() {
    let router = router();
    let mut request = layout_request("api-bad");
    request["rooms"] = json!([]);

    let (status, body) = call(&router, Method::POST, "/api/v1/layouts", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("room program is empty"));
}

#[tokio::test]
async fn test_review_flow() {
    let router = router();
    call(&router, Method::POST, "/api/v1/layouts", Some(layout_request("api-2"))).await;

    let (status, body) = call(&router, Method::GET, "/api/v1/reviews?state=pending", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/reviews/claim",
        Some(json!({"reviewer": "ana"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["correlation_id"], "api-2");
    assert_eq!(body["data"]["state"], "in_review");

    let (status, _) = call(
        &router,
        Method::POST,
        "/api/v1/reviews/api-2/claim",
        Some(json!({"reviewer": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &router,
        Method::POST,
        "/api/v1/reviews/api-2/resolve",
        Some(json!({"reviewer": "bob", "decision": "approve"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/reviews/api-2/resolve",
        Some(json!({"reviewer": "ana", "decision": "reject"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "rejected");

    let (_, body) = call(&router, Method::GET, "/api/v1/layouts/api-2", None).await;
    assert_eq!(body["data"]["review"]["state"], "rejected");
    assert_eq!(body["data"]["review"]["reviewer"], "ana");
}

#[tokio::test]
async fn test_edit_without_proposal_is_rejected() {
    let router = router();
    call(&router, Method::POST, "/api/v1/layouts", Some(layout_request("api-3"))).await;
    call(
        &router,
        Method::POST,
        "/api/v1/reviews/api-3/claim",
        Some(json!({"reviewer": "ana"})),
    )
    .await;

    let (status, _) = call(
        &router,
        Method::POST,
        "/api/v1/reviews/api-3/resolve",
        Some(json!({"reviewer": "ana", "decision": "edit"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/reviews/api-3/release",
        Some(json!({"reviewer": "ana"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "pending");
}

#[test]
fn test_status_mapping() {
    assert_eq!(
        status_for(&Error::InProgress("x".into())),
        StatusCode::ACCEPTED
    );
    assert_eq!(
        status_for(&Error::Timeout {
            correlation_id: "x".into(),
            budget_ms: 10
        }),
        StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
        status_for(&Error::Review(ReviewError::MissingEditedProposal)),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(&Error::Persistence("disk".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
