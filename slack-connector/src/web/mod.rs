//! Web server module for handling inbound Slack webhooks.
//!
//! This module provides the HTTP surface of the connector:
//! - `POST /webhook` verifies, decodes and forwards Slack events
//! - `GET /health` reports liveness

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{
    handle_webhook, health, AppState, ChallengeResponse, HealthResponse, WebhookResponse,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(handle_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
