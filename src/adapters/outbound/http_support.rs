//! Shared HTTP plumbing for the outbound adapters.

use crate::domain::errors::GeocodeError;
use reqwest::StatusCode;
use std::time::Duration;

/// Build the client every HTTP adapter uses.
pub fn build_client(timeout: Duration, user_agent: &str) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Statuses a provider returns while overloaded or restarting.
pub fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Classify a non-success geocoder status.
pub fn status_error(status: StatusCode) -> GeocodeError {
    if is_transient_status(status) {
        GeocodeError::Transient(format!("status {}", status))
    } else {
        GeocodeError::Unexpected(format!("status {}", status))
    }
}

/// Classify a transport failure. Refused connections and timeouts are worth
/// a retry; anything else is not.
pub fn transport_error(err: reqwest::Error) -> GeocodeError {
    if err.is_connect() || err.is_timeout() {
        GeocodeError::Transient(err.to_string())
    } else if err.is_decode() {
        GeocodeError::Unexpected(format!("malformed response: {}", err))
    } else {
        GeocodeError::Unexpected(err.to_string())
    }
}

/// Join a base URL and a path without doubling the slash.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
