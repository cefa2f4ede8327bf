//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup and shared immutably afterwards.

use std::env;
use tracing::warn;
use url::Url;

/// Default in-cluster publish endpoint of the Kyma event bus.
pub const DEFAULT_EVENTS_URL: &str = "http://event-bus-publish.kyma-system:8080/v1/events";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Slack signing secret used to verify inbound webhooks
    pub signing_secret: String,

    /// Maximum age in seconds for Slack request timestamps
    pub signature_max_age: u64,

    /// Kyma event bus publish endpoint
    pub events_url: String,

    /// Connector name, used to derive the event source identifier
    pub connector_name: String,

    /// Version stamped on every forwarded event
    pub event_type_version: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            signing_secret: env::var("SLACK_SIGNING_SECRET").unwrap_or_default(),

            signature_max_age: env::var("SLACK_SIGNATURE_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300), // 5 minutes default

            events_url: parse_url("KYMA_EVENTS_URL", DEFAULT_EVENTS_URL),

            connector_name: env::var("SLACK_CONNECTOR_NAME")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "slack-connector".to_string()),

            event_type_version: env::var("EVENT_TYPE_VERSION")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "v1".to_string()),
        }
    }

    /// Identifier the event bus knows this connector's application by.
    pub fn source_id(&self) -> String {
        format!("{}-app", self.connector_name)
    }
}

/// Parse an HTTP(S) URL from the environment, falling back to `default` when unset or invalid.
fn parse_url(name: &str, default: &str) -> String {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default.to_string(),
    };

    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        _ => {
            warn!(env_var = name, value = %raw, "Invalid URL, using default");
            default.to_string()
        }
    }
}
