use crate::core::error::TrackerError;
use reqwest::{Client, Response};
use std::time::Duration;

const USER_AGENT: &str = concat!("cryptex/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by the providers.
///
/// Every request made with it gives up after `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client, TrackerError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Turns a non-2xx response into a network error naming `what` was called.
pub fn ensure_success(response: Response, what: &str) -> Result<Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TrackerError::Network(format!("HTTP error: {status} from {what}")))
    }
}
