//! HTTP API for event callbacks and bot metrics.

use crate::{BotMetrics, InboundEvent, MessageRouter};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// API state shared by all handlers.
#[derive(Clone)]
pub struct ApiState {
    router: MessageRouter,
    metrics: BotMetrics,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(router: MessageRouter) -> Self {
        let metrics = router.metrics().clone();
        Self { router, metrics }
    }
}

/// Body returned from the callback endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackResponse {
    /// Text to post back to the chat, if any
    pub reply: Option<String>,
}

/// Creates the callback and metrics router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/callback", post(callback))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Get current metrics snapshot.
async fn get_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.metrics.snapshot();
    (StatusCode::OK, Json(snapshot))
}

/// Route one inbound event and return the reply to send, if any.
async fn callback(
    State(state): State<ApiState>,
    Json(event): Json<InboundEvent>,
) -> impl IntoResponse {
    tracing::debug!(event_key = %event.message_id, "New callback received");
    let reply = state.router.handle(&event).await.into_reply();
    (StatusCode::OK, Json(CallbackResponse { reply }))
}
