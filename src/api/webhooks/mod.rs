//! Webhook endpoints for chat transports

use std::sync::Arc;

use axum::{Router, routing::post};

use super::ApiState;

pub mod telegram;

/// Build webhooks router, nested under `/telegram`
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/webhook", post(telegram::handle_update))
        .with_state(state)
}
