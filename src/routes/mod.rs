//! API route handlers
//!
//! This module contains all HTTP endpoint implementations for the match
//! server. Routes are organized by functionality:
//!
//! - `health`: Health checks and readiness
//! - `matching`: Match request, cancel, and queue diagnostics
//! - `ws`: WebSocket endpoint for match notifications

pub mod health;
pub mod matching;
pub mod ws;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Returns server information including version and available endpoints.
/// This is the root endpoint (GET /) and requires no authentication.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "MBTI Match Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/match/request",
            "/match/cancel",
            "/match/queue/{mbti}",
            "/ws/match/{user_id}",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
