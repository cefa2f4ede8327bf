//! Slack module for authenticating and decoding Events API webhooks.
//!
//! ## Flow
//!
//! ```text
//! HTTP request → validate_payload() (signature) → parse_webhook() → SlackEvent
//! ```

pub mod signature;
pub mod types;
pub mod validator;

pub use signature::{verify_slack_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
pub use types::{CallbackEvent, InnerEvent, SlackEvent, UrlVerificationEvent};
pub use validator::{SlackValidator, Validator};
