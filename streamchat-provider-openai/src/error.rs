//! Internal helpers mapping HTTP/reqwest failures to [`TransportError`].

use std::time::Duration;

use streamchat_types::TransportError;
use thiserror::Error;

/// Errors building a client from the environment.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API key variable is unset or blank.
    #[error("environment variable {0} is not set")]
    MissingApiKey(&'static str),
}

/// Map a non-success HTTP status to a [`TransportError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> TransportError {
    TransportError::Status {
        status: status.as_u16(),
        body: extract_error_message(body).unwrap_or_else(|| body.to_string()),
    }
}

/// Pull `error.message` out of an OpenAI-style error body, if it has one.
fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json["error"]["message"].as_str().map(str::to_string)
}

/// Map a [`reqwest::Error`] to a [`TransportError`].
///
/// `timeout` is the limit configured on the client; without one a timeout
/// cannot be attributed and is reported as a network error.
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Option<Duration>) -> TransportError {
    match timeout {
        Some(limit) if err.is_timeout() => TransportError::Timeout(limit),
        _ => TransportError::Network(Box::new(err)),
    }
}
