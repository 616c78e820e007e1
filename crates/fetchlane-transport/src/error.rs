//! Transport error types
//!
//! Every failure a caller can observe from this crate is a [`TransportError`].
//! Timeouts are produced in exactly one place ([`crate::traits::make_timeout_error`])
//! so they are recognizable no matter which backend raised them.

use std::time::Duration;
use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Error code carried by every timeout error.
pub const TIMEOUT_ERROR_CODE: &str = "ETIMEDOUT";

/// Error codes that indicate the peer closed the connection mid-request.
pub const CONNECTION_CLOSED_ERROR_CODES: [&str; 2] = ["ECONNRESET", "EPIPE"];

/// Errors that can occur in transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not settle before its timeout elapsed.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// The fetch function could not establish a connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The peer closed the connection while the request was in flight.
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Any other failure surfaced by the fetch function.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Reading the response body failed.
    #[error("Body error: {0}")]
    Body(String),

    /// The response body is not valid JSON.
    #[error("Failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request descriptor was rejected before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The destination locator could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Opaque failure from a custom fetch function, passed through as-is.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TransportError {
    /// Whether this is the canonical timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Whether the peer closed the connection.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed(_))
    }

    /// Errno-style code for the error, when one applies.
    ///
    /// `ConnectionClosed` errors report `ECONNRESET` unless the message names
    /// a broken pipe.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Timeout(_) => Some(TIMEOUT_ERROR_CODE),
            Self::ConnectionClosed(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("broken pipe") || lower.contains("epipe") {
                    Some(CONNECTION_CLOSED_ERROR_CODES[1])
                } else {
                    Some(CONNECTION_CLOSED_ERROR_CODES[0])
                }
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            return Self::Connection(err.to_string());
        }
        if is_reset_or_broken_pipe(&err) {
            return Self::ConnectionClosed(err.to_string());
        }
        if err.is_body() || err.is_decode() {
            return Self::Body(err.to_string());
        }
        Self::Http(err.to_string())
    }
}

/// Walk the source chain looking for a reset or broken-pipe I/O error.
fn is_reset_or_broken_pipe(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            return matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::BrokenPipe
            );
        }
        current = e.source();
    }
    false
}
