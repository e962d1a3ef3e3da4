//! Server error types
//!
//! Every failure the pipeline can hit while serving a connection, plus the
//! startup failures (configuration, binding). [`ServerError::status`] maps a
//! request-scoped failure onto the response the client receives.

use kite_core::{ParseError, StatusCode};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Kite error type covering all failure modes
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request bytes could not be parsed
    #[error("Malformed request: {0}")]
    MalformedRequest(#[from] ParseError),

    /// Declared body exceeds the configured limit
    #[error("Payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: usize, limit: usize },

    /// The client did not deliver a complete request in time
    #[error("Timeout: no complete request after {0:?}")]
    Timeout(Duration),

    /// A controller failed while producing its response
    #[error("Handler error: {0}")]
    Handler(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServerError {
    /// Status code sent to the client when this error ends a request
    ///
    /// Read failures count as malformed requests.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) | Self::Io(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::Handler(_) | Self::Config(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<String> for ServerError {
    fn from(msg: String) -> Self {
        Self::Handler(msg)
    }
}

impl From<&str> for ServerError {
    fn from(msg: &str) -> Self {
        Self::Handler(msg.to_string())
    }
}

/// Convenient Result type for Kite operations
pub type ServerResult<T> = Result<T, ServerError>;
