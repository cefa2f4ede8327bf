//! Slack Events API payload types.
//!
//! Slack wraps every delivery in an outer envelope whose `type` field
//! selects the payload shape:
//! - `event_callback`: a workspace event, wrapped with delivery metadata
//! - `url_verification`: the endpoint handshake sent when the URL is configured
//! - `app_rate_limited`: notice that deliveries are being throttled

use serde::Deserialize;

/// Outer `type` of a callback event.
pub const EVENT_CALLBACK: &str = "event_callback";

/// Outer `type` of the endpoint handshake.
pub const URL_VERIFICATION: &str = "url_verification";

/// Outer `type` of a rate limiting notice.
pub const APP_RATE_LIMITED: &str = "app_rate_limited";

/// Decoded Slack Events API payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum SlackEvent {
    #[serde(rename = "event_callback")]
    Callback(CallbackEvent),
    #[serde(rename = "url_verification")]
    UrlVerification(UrlVerificationEvent),
    #[serde(rename = "app_rate_limited")]
    AppRateLimited(AppRateLimitedEvent),
}

impl SlackEvent {
    /// Event type forwarded to the event bus, if this payload is forwarded at all.
    pub fn forwarded_type(&self) -> Option<&str> {
        match self {
            SlackEvent::Callback(e) => Some(&e.event.event_type),
            SlackEvent::AppRateLimited(_) => Some(APP_RATE_LIMITED),
            SlackEvent::UrlVerification(_) => None,
        }
    }

    /// Slack's unique delivery identifier (empty when the payload has none).
    pub fn event_id(&self) -> &str {
        match self {
            SlackEvent::Callback(e) => &e.event_id,
            _ => "",
        }
    }
}

/// A workspace event wrapped with delivery metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CallbackEvent {
    /// Deprecated verification token
    #[serde(default)]
    pub token: String,
    /// Workspace the event occurred in
    #[serde(default)]
    pub team_id: String,
    /// App the event is delivered to
    #[serde(default)]
    pub api_app_id: String,
    /// The wrapped event
    pub event: InnerEvent,
    /// Unique delivery identifier
    #[serde(default)]
    pub event_id: String,
    /// Epoch seconds when the event was dispatched
    #[serde(default)]
    pub event_time: i64,
}

/// The event itself, e.g. `message` or `app_mention`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InnerEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub event_ts: Option<String>,
}

/// Endpoint handshake; the challenge must be echoed back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UrlVerificationEvent {
    #[serde(default)]
    pub token: String,
    pub challenge: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppRateLimitedEvent {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub api_app_id: String,
    /// Epoch minute the rate limiting started
    #[serde(default)]
    pub minute_rate_limited: i64,
}

pub(crate) fn is_known_type(kind: &str) -> bool {
    matches!(kind, EVENT_CALLBACK | URL_VERIFICATION | APP_RATE_LIMITED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_deserialization() {
        let json = r#"{
            "token": "XXYYZZ",
            "team_id": "T123ABC456",
            "api_app_id": "A123ABC456",
            "event": {
                "type": "message",
                "channel": "C123ABC456",
                "user": "U123ABC456",
                "text": "hello",
                "ts": "1355517523.000005",
                "event_ts": "1355517523.000005"
            },
            "type": "event_callback",
            "authed_users": ["U123ABC456"],
            "event_id": "Ev123ABC456",
            "event_time": 1234567890
        }"#;

        let event: SlackEvent = serde_json::from_str(json).unwrap();
        match &event {
            SlackEvent::Callback(cb) => {
                assert_eq!(cb.team_id, "T123ABC456");
                assert_eq!(cb.event.event_type, "message");
                assert_eq!(cb.event.text.as_deref(), Some("hello"));
                assert_eq!(cb.event_time, 1234567890);
            }
            other => panic!("Expected Callback variant, got {:?}", other),
        }
        assert_eq!(event.forwarded_type(), Some("message"));
        assert_eq!(event.event_id(), "Ev123ABC456");
    }

    #[test]
    fn test_url_verification_deserialization() {
        let json = r#"{"token":"t","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P","type":"url_verification"}"#;

        let event: SlackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.forwarded_type(), None);
        assert_eq!(event.event_id(), "");
        assert!(matches!(event, SlackEvent::UrlVerification(ref v) if v.challenge.starts_with("3eZb")));
    }

    #[test]
    fn test_app_rate_limited_forwarded_type() {
        let json = r#"{"type":"app_rate_limited","team_id":"T1","minute_rate_limited":1518467820,"api_app_id":"A1"}"#;

        let event: SlackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.forwarded_type(), Some(APP_RATE_LIMITED));
    }

    #[test]
    fn test_known_types() {
        assert!(is_known_type("event_callback"));
        assert!(is_known_type("url_verification"));
        assert!(is_known_type("app_rate_limited"));
        assert!(!is_known_type("block_actions"));
    }
}
