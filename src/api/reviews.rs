//! Review queue API endpoints
//!
//! GET /api/v1/reviews - List review items
//! POST /api/v1/reviews/claim - Claim the head of the queue
//! POST /api/v1/reviews/:id/claim - Claim a specific item
//! POST /api/v1/reviews/:id/release - Hand a claimed item back
//! POST /api/v1/reviews/:id/resolve - Approve, reject or edit

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use floorgate_core::{Engine, ReviewDecision, ReviewFilter, ReviewItem};
use floorgate_llm::LayoutProposal;
use serde::Deserialize;

use super::{respond, ApiResponse};

/// Body of claim and release calls
#[derive(Debug, Deserialize)]
pub struct ReviewerBody {
    pub reviewer: String,
}

/// Body of a resolve call
#[derive(Debug, Deserialize)]
pub struct ResolveBody {
    pub reviewer: String,
    pub decision: ReviewDecision,
    #[serde(default)]
    pub edited_proposal: Option<LayoutProposal>,
}

async fn list_reviews(
    Extension(engine): Extension<Arc<Engine>>,
    Query(filter): Query<ReviewFilter>,
) -> Json<ApiResponse<Vec<ReviewItem>>> {
    Json(ApiResponse::success(
        engine.list_pending_reviews(&filter).await,
    ))
}

async fn claim_next(
    Extension(engine): Extension<Arc<Engine>>,
    Json(body): Json<ReviewerBody>,
) -> Response {
    respond(engine.claim_review(&body.reviewer).await)
}

async fn claim_item(
    Extension(engine): Extension<Arc<Engine>>,
    Path(id): Path<String>,
    Json(body): Json<ReviewerBody>,
) -> Response {
    match engine.claim_review_by_id(&id, &body.reviewer).await {
        Ok(Some(item)) => Json(ApiResponse::success(item)).into_response(),
        Ok(None) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<ReviewItem>::error(format!(
                "Review item '{id}' is not pending"
            ))),
        )
            .into_response(),
        Err(e) => super::error_response(&e),
    }
}

async fn release_item(
    Extension(engine): Extension<Arc<Engine>>,
    Path(id): Path<String>,
    Json(body): Json<ReviewerBody>,
) -> Response {
    respond(engine.release_review(&id, &body.reviewer).await)
}

async fn resolve_item(
    Extension(engine): Extension<Arc<Engine>>,
    Path(id): Path<String>,
    Json(body): Json<ResolveBody>,
) -> Response {
    respond(
        engine
            .resolve_review(&id, &body.reviewer, body.decision, body.edited_proposal)
            .await,
    )
}

/// Create review routes
pub fn reviews_routes() -> Router {
    Router::new()
        .route("/api/v1/reviews", get(list_reviews))
        .route("/api/v1/reviews/claim", post(claim_next))
        .route("/api/v1/reviews/:id/claim", post(claim_item))
        .route("/api/v1/reviews/:id/release", post(release_item))
        .route("/api/v1/reviews/:id/resolve", post(resolve_item))
}
