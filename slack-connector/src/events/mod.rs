//! Events module for forwarding normalized envelopes to the Kyma event bus.
//!
//! ## Flow
//!
//! ```text
//! send_to_kyma() → EventRequestPayload → PayloadValidator → POST <events url>
//! ```

pub mod payload;
pub mod sender;

pub use payload::{format_event_time, EnvelopeValidator, EventRequestPayload, PayloadValidator};
pub use sender::{KymaSender, Sender};
