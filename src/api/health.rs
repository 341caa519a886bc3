//! Health check endpoints
//!
//! Provides:
//! - `/health`: simple "healthy" + version (for load balancers)
//! - `/health/detailed`: store, providers and queue depth

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use floorgate_core::Engine;
use serde::Serialize;
use std::sync::Arc;

/// Simple health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health response
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: String,
    pub providers: Vec<String>,
    pub active_requests: usize,
    pub pending_reviews: usize,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn health_detailed(
    Extension(engine): Extension<Arc<Engine>>,
) -> Json<DetailedHealthResponse> {
    let providers = engine
        .provider_names()
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    // Fallback-only engines still answer, but every request goes to review.
    let status = if providers.is_empty() {
        "degraded"
    } else {
        "healthy"
    };

    Json(DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store: engine.store_name().to_string(),
        providers,
        active_requests: engine.active_count(),
        pending_reviews: engine.review_queue().pending_count().await,
    })
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(health_detailed))
}
