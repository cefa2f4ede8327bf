//! Slack request signature verification.
//!
//! Slack signs every Events API request using HMAC-SHA256 over a versioned
//! basestring. Reference: https://api.slack.com/authentication/verifying-requests-from-slack

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Header carrying the Unix timestamp the signature was computed for.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Signature scheme version prefix.
const VERSION: &str = "v0";

/// Verify a Slack request signature.
///
/// The expected signature is `v0=` followed by the hex encoded
/// HMAC-SHA256 of `v0:{timestamp}:{body}` keyed with the signing secret.
///
/// # Arguments
///
/// * `signing_secret` - The app's Slack signing secret
/// * `timestamp` - The `X-Slack-Request-Timestamp` header value
/// * `body` - The raw, unmodified request body
/// * `signature` - The `X-Slack-Signature` header value
/// * `max_age_seconds` - Maximum allowed age of the timestamp (prevents replay attacks)
///
/// # Returns
///
/// `true` if the signature is valid and not stale, `false` otherwise.
pub fn verify_slack_signature(
    signing_secret: &str,
    timestamp: &str,
    body: &[u8],
    signature: &str,
    max_age_seconds: u64,
) -> bool {
    if signing_secret.is_empty() || timestamp.is_empty() || signature.is_empty() {
        warn!(
            has_signing_secret = !signing_secret.is_empty(),
            has_timestamp = !timestamp.is_empty(),
            has_signature = !signature.is_empty(),
            "slack_signature_missing_fields"
        );
        return false;
    }

    let request_time: u64 = match timestamp.parse() {
        Ok(t) => t,
        Err(_) => {
            warn!(timestamp = %timestamp, "slack_signature_invalid_timestamp");
            return false;
        }
    };

    let current_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let age = current_time.abs_diff(request_time);
    if age > max_age_seconds {
        warn!(
            request_time = request_time,
            current_time = current_time,
            age_seconds = age,
            max_age_seconds = max_age_seconds,
            "slack_signature_stale"
        );
        return false;
    }

    let provided = match signature
        .strip_prefix(VERSION)
        .and_then(|rest| rest.strip_prefix('='))
        .and_then(|digest| hex::decode(digest).ok())
    {
        Some(bytes) => bytes,
        None => {
            warn!(signature_length = signature.len(), "slack_signature_malformed");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(signing_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("slack_signature_invalid_key");
            return false;
        }
    };

    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);

    // verify_slice compares in constant time
    let valid = mac.verify_slice(&provided).is_ok();

    if !valid {
        warn!(body_length = body.len(), "slack_signature_mismatch");
    }

    valid
}

/// Compute the `X-Slack-Signature` value for a request.
#[cfg(test)]
pub(crate) fn sign_slack_request(signing_secret: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).ok()?;
    mac.update(format!("{}:{}:", VERSION, timestamp).as_bytes());
    mac.update(body);
    Some(format!("{}={}", VERSION, hex::encode(mac.finalize().into_bytes())))
}
