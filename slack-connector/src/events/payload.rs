//! Event envelope sent to the Kyma event bus.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::apperrors::AppError;

/// Normalized event envelope, decoupled from the source webhook format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventRequestPayload {
    pub event_type: String,
    pub event_type_version: String,
    pub event_id: String,
    /// RFC3339 timestamp, stamped when the event is sent
    pub event_time: String,
    pub source_id: String,
    /// The source payload, embedded verbatim
    pub data: Box<RawValue>,
}

impl EventRequestPayload {
    /// Build an envelope stamped with the current time.
    pub fn new(
        event_type: &str,
        event_type_version: &str,
        event_id: &str,
        source_id: &str,
        data: Box<RawValue>,
    ) -> Self {
        Self {
            event_type: event_type.to_string(),
            event_type_version: event_type_version.to_string(),
            event_id: event_id.to_string(),
            event_time: format_event_time(Utc::now()),
            source_id: source_id.to_string(),
            data,
        }
    }
}

/// Format a timestamp the way the event bus expects it.
pub fn format_event_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Struct-level validation applied to every envelope before it is sent.
pub trait PayloadValidator: Send + Sync {
    fn validate(&self, payload: &EventRequestPayload) -> Result<(), AppError>;
}

/// Checks the fields the event bus requires.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeValidator;

impl PayloadValidator for EnvelopeValidator {
    fn validate(&self, payload: &EventRequestPayload) -> Result<(), AppError> {
        let required = [
            ("event-type", &payload.event_type),
            ("event-type-version", &payload.event_type_version),
            ("source-id", &payload.source_id),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Internal(format!(
                "event payload missing required fields: {}",
                missing.join(", ")
            )));
        }

        DateTime::parse_from_rfc3339(&payload.event_time).map_err(|e| {
            AppError::Internal(format!(
                "event-time '{}' is not RFC3339: {}",
                payload.event_time, e
            ))
        })?;

        Ok(())
    }
}
