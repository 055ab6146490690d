//! Error types shared by clients and the session.

use std::time::Duration;

use thiserror::Error;

/// Failure of a streaming completion request.
///
/// Every variant is a transport failure as far as the conversation is
/// concerned: the turn ends with the fixed failure message and is never
/// retried. The variants exist for diagnostics.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connecting to or reading from the endpoint failed.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The event stream could not be decoded or carried an error object.
    #[error("malformed stream: {0}")]
    MalformedStream(String),
}

impl TransportError {
    /// The HTTP status code, when the endpoint returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A [`RequestParameters`](crate::RequestParameters) field outside its allowed range.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// `max_tokens` must be positive.
    #[error("max_tokens must be greater than zero")]
    MaxTokens,

    /// A sampling parameter is not a finite number in `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfRange {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// The model identifier is not one of the offered models.
    #[error("unknown model: {0}")]
    UnknownModel(String),
}
