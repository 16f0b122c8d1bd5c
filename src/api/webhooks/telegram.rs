//! Telegram webhook handler

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::api::ApiState;
use crate::api::middleware::RequestId;
use crate::pipeline::{Delivery, RawInboundEvent};

/// Header Telegram uses to echo the secret given to `setWebhook`
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Telegram webhook response
#[derive(Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
}

/// Handle an incoming Telegram update
///
/// Returns 200 as soon as the update is accepted and runs the pipeline on a
/// background task, so slow OCR never makes Telegram retry the delivery.
#[allow(clippy::unused_async)]
pub async fn handle_update(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(correlation_id)): Extension<RequestId>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    if let Some(expected) = state.webhook_secret.as_ref().map(|s| s.expose_secret()) {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());

        if provided != Some(expected) {
            tracing::warn!(correlation_id, "Telegram webhook secret mismatch");
            return (StatusCode::FORBIDDEN, Json(WebhookResponse { ok: false }));
        }
    }

    let event = match RawInboundEvent::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(correlation_id, error = %e, "rejecting malformed Telegram update");
            return (StatusCode::BAD_REQUEST, Json(WebhookResponse { ok: false }));
        }
    };

    tracing::debug!(correlation_id, update_id = event.update_id, "received Telegram update");

    let from_bot = event
        .message
        .as_ref()
        .and_then(|m| m.from.as_ref())
        .is_some_and(|u| u.is_bot);
    if from_bot {
        tracing::debug!(correlation_id, update_id = event.update_id, "ignoring message from a bot");
        return (StatusCode::OK, Json(WebhookResponse { ok: true }));
    }

    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        match pipeline.process(&correlation_id, event).await {
            Ok(Delivery::Ignored) => {
                tracing::debug!(correlation_id, "update ignored");
            }
            Ok(Delivery::Replied { .. }) => {}
            Err(e) => {
                tracing::error!(correlation_id, error = %e, "Telegram update processing failed");
            }
        }
    });

    (StatusCode::OK, Json(WebhookResponse { ok: true }))
}
