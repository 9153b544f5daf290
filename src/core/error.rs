//! Error taxonomy shared by the price and store clients.

use thiserror::Error;

/// Failures a lookup, store call or form check can report.
///
/// Network and store failures are steady-state conditions: callers receive
/// them as values and decide what to show, nothing here panics.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Transport failure, timeout or a non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    /// The price API answered but had no quote for the pair.
    #[error("No price available for {asset_id} in {currency}")]
    NotFound { asset_id: String, currency: String },

    /// A payload could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Form input failed the submission gate.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query strings so request parameters never end up in messages.
        let msg = e.to_string();
        let sanitized = match msg.find('?') {
            Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
            None => msg,
        };
        if e.is_timeout() {
            TrackerError::Network(format!("request timed out: {sanitized}"))
        } else {
            TrackerError::Network(sanitized)
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Parse(e.to_string())
    }
}
