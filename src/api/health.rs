//! Health check endpoints

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build health router; served on both `/` and `/health`
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
}
