//! Layouts API endpoints
//!
//! POST /api/v1/layouts - Submit a layout request
//! GET /api/v1/layouts/:id - Current response and review state
//! GET /api/v1/layouts/:id/audit - Audit trail
//! POST /api/v1/layouts/:id/cancel - Cancel an in-flight request

use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use floorgate_core::Engine;
use floorgate_llm::LayoutRequest;
use floorgate_replay::AuditRecord;
use serde::Serialize;
use tracing::info;

use super::{respond, ApiResponse};

/// One audit trail entry
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub sequence_num: i64,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

impl From<AuditRecord> for AuditEntry {
    fn from(record: AuditRecord) -> Self {
        Self {
            sequence_num: record.sequence_num,
            event_type: record.event_type.to_string(),
            payload: record.payload,
            timestamp: record.timestamp,
            duration_ms: record.duration_ms,
        }
    }
}

/// Result of a cancel call
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub correlation_id: String,
    pub cancelled: bool,
}

async fn submit_layout(
    Extension(engine): Extension<Arc<Engine>>,
    Json(request): Json<LayoutRequest>,
) -> Response {
    respond(engine.submit(request).await)
}

async fn get_layout(
    Extension(engine): Extension<Arc<Engine>>,
    Path(id): Path<String>,
) -> Response {
    respond(engine.get_status(&id).await)
}

async fn get_audit_trail(
    Extension(engine): Extension<Arc<Engine>>,
    Path(id): Path<String>,
) -> Response {
    respond(
        engine
            .audit_trail(&id)
            .await
            .map(|records| records.into_iter().map(AuditEntry::from).collect::<Vec<_>>()),
    )
}

async fn cancel_layout(
    Extension(engine): Extension<Arc<Engine>>,
    Path(id): Path<String>,
) -> Response {
    if engine.cancel(&id) {
        info!(correlation_id = %id, "Cancellation requested over HTTP");
        return Json(ApiResponse::success(CancelResponse {
            correlation_id: id,
            cancelled: true,
        }))
        .into_response();
    }
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<CancelResponse>::error(format!(
            "No request in flight for '{id}'"
        ))),
    )
        .into_response()
}

/// Create layouts routes
pub fn layouts_routes() -> Router {
    Router::new()
        .route("/api/v1/layouts", post(submit_layout))
        .route("/api/v1/layouts/:id", get(get_layout))
        .route("/api/v1/layouts/:id/audit", get(get_audit_trail))
        .route("/api/v1/layouts/:id/cancel", post(cancel_layout))
}
