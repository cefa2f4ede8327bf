//! Inbound request authentication and payload decoding.

use axum::http::HeaderMap;
use tracing::{info, warn};

use super::signature::{verify_slack_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use super::types::{is_known_type, SlackEvent};
use crate::apperrors::AppError;

/// Authenticates and decodes inbound Slack webhooks.
pub trait Validator: Send + Sync {
    /// The shared secret inbound requests are signed with.
    fn get_token(&self) -> String;

    /// Verify the request signature against `expected_token`, returning the verified body.
    fn validate_payload(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        expected_token: &str,
    ) -> Result<Vec<u8>, AppError>;

    /// Decode a verified body into a Slack event.
    fn parse_webhook(&self, payload: &[u8]) -> Result<SlackEvent, AppError>;
}

/// Validator for Slack's v0 request signing scheme.
#[derive(Debug, Clone)]
pub struct SlackValidator {
    signing_secret: String,
    max_age_seconds: u64,
}

impl SlackValidator {
    pub fn new(signing_secret: impl Into<String>, max_age_seconds: u64) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            max_age_seconds,
        }
    }
}

impl Validator for SlackValidator {
    fn get_token(&self) -> String {
        self.signing_secret.clone()
    }

    fn validate_payload(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        expected_token: &str,
    ) -> Result<Vec<u8>, AppError> {
        let timestamp = header_str(headers, TIMESTAMP_HEADER);
        let signature = header_str(headers, SIGNATURE_HEADER);

        if !verify_slack_signature(
            expected_token,
            timestamp,
            body,
            signature,
            self.max_age_seconds,
        ) {
            return Err(AppError::AuthenticationFailed(
                "invalid Slack request signature".to_string(),
            ));
        }

        Ok(body.to_vec())
    }

    fn parse_webhook(&self, payload: &[u8]) -> Result<SlackEvent, AppError> {
        let envelope: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(payload)
            .map_err(|e| {
                warn!(error = %e, "slack_payload_malformed");
                AppError::WrongInput(format!("malformed event payload: {}", e))
            })?;

        let kind = envelope
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        if !is_known_type(&kind) {
            warn!(event_type = %kind, "slack_event_unknown");
            return Err(AppError::NotFound(format!("unknown event type '{}'", kind)));
        }

        let event: SlackEvent = serde_json::from_slice(payload).map_err(|e| {
            warn!(event_type = %kind, error = %e, "slack_payload_invalid");
            AppError::WrongInput(format!("invalid {} payload: {}", kind, e))
        })?;

        if let SlackEvent::Callback(callback) = &event {
            if callback.event.event_type.trim().is_empty() {
                warn!(event_id = %callback.event_id, "slack_inner_event_type_missing");
                return Err(AppError::NotFound(
                    "callback carries no inner event type".to_string(),
                ));
            }
        }

        info!(
            event_type = %kind,
            event_id = %event.event_id(),
            "slack_event_parsed"
        );

        Ok(event)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
