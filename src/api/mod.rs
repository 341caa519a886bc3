//! Web API module for Floorgate
//!
//! Provides REST API endpoints for:
//! - Layout submission, status polling and audit trails
//! - The human review queue
//! - Health checks

pub mod health;
pub mod layouts;
pub mod reviews;

#[cfg(test)]
mod tests;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use floorgate_core::{Error, ReviewError, UserFriendlyError};
use serde::Serialize;

pub use health::health_routes;
pub use layouts::layouts_routes;
pub use reviews::reviews_routes;

/// Envelope of every API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for an engine error
pub fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Schema(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) | Error::Review(ReviewError::NotFound(_)) => StatusCode::NOT_FOUND,
        Error::InProgress(_) => StatusCode::ACCEPTED,
        Error::Review(
            ReviewError::NotClaimedBy { .. }
            | ReviewError::AlreadyResolved(_)
            | ReviewError::AlreadyQueued(_),
        ) => StatusCode::CONFLICT,
        Error::Review(_) => StatusCode::BAD_REQUEST,
        Error::Cancelled(_) => StatusCode::CONFLICT,
        Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        Error::ProviderChainExhausted(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error response for an engine error
pub fn error_response(error: &Error) -> Response {
    (
        status_for(error),
        Json(ApiResponse::<()>::error(error.user_message())),
    )
        .into_response()
}

/// Turn an engine result into an HTTP response
pub fn respond<T: Serialize>(result: floorgate_core::Result<T>) -> Response {
    match result {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new()
        .merge(layouts_routes())
        .merge(reviews_routes())
}
