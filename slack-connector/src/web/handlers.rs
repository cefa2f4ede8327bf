//! Webhook endpoint handlers.
//!
//! The Slack webhook handler runs each request through a linear pipeline:
//! 1. Verify the request signature
//! 2. Decode the Events API payload
//! 3. Forward a normalized envelope to the Kyma event bus
//!
//! Every failure maps to a single HTTP status and ends the request.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::value::RawValue;
use tracing::{error, info, warn};

use crate::apperrors::AppError;
use crate::events::Sender;
use crate::slack::{SlackEvent, Validator};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub validator: Arc<dyn Validator>,
    pub sender: Arc<dyn Sender>,
}

impl AppState {
    pub fn new(config: Config, validator: Arc<dyn Validator>, sender: Arc<dyn Sender>) -> Self {
        Self {
            config: Arc::new(config),
            validator,
            sender,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Slack Webhook
// =============================================================================

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Reply to Slack's URL verification handshake.
#[derive(Serialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

/// Slack webhook endpoint.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    info!(body_length = body.len(), "slack_webhook_received");

    let token = state.validator.get_token();
    let payload = state
        .validator
        .validate_payload(&headers, &body, &token)
        .inspect_err(|e| warn!(error = %e, "slack_webhook_unauthorized"))?;

    let event = state
        .validator
        .parse_webhook(&payload)
        .inspect_err(|e| warn!(error = %e, "slack_webhook_rejected"))?;

    if let SlackEvent::UrlVerification(verification) = &event {
        info!("slack_url_verification_answered");
        return Ok(Json(ChallengeResponse {
            challenge: verification.challenge.clone(),
        })
        .into_response());
    }

    let event_type = event
        .forwarded_type()
        .ok_or_else(|| AppError::NotFound("event is not forwardable".to_string()))?
        .to_string();
    let event_id = event.event_id().to_string();

    let data = String::from_utf8(payload)
        .ok()
        .and_then(|raw| RawValue::from_string(raw).ok())
        .ok_or_else(|| AppError::WrongInput("event payload is not valid UTF-8 JSON".to_string()))?;

    let source_id = state.config.source_id();
    state
        .sender
        .send_to_kyma(
            &event_type,
            &state.config.event_type_version,
            &event_id,
            &source_id,
            data,
        )
        .await
        .inspect_err(|e| error!(event_type = %event_type, error = %e, "slack_webhook_forward_failed"))?;

    info!(
        event_type = %event_type,
        event_id = %event_id,
        source_id = %source_id,
        "slack_webhook_forwarded"
    );

    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            status: "forwarded",
            event_id: Some(event_id).filter(|id| !id.is_empty()),
        }),
    )
        .into_response())
}
