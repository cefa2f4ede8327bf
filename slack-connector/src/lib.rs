//! Slack Connector - relays Slack Events API webhooks to the Kyma event bus.
//!
//! ## Architecture
//!
//! ```text
//! Slack → POST /webhook → Validator (signature, decode) → Sender → Kyma event bus
//! ```
//!
//! Each request is handled independently; nothing is queued or retried.

pub mod apperrors;
pub mod config;
pub mod events;
pub mod slack;
pub mod web;

// Re-export commonly used types
pub use apperrors::{AppError, ErrorCode};
pub use config::Config;
pub use events::{EventRequestPayload, KymaSender, Sender};
pub use slack::{SlackEvent, SlackValidator, Validator};
pub use web::{router, AppState};
