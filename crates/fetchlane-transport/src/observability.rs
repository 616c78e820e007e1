//! Structured logging for outbound requests
//!
//! Adapters log every request, outcome and timeout through this module so
//! field names stay consistent across backends. No subscriber is installed
//! here; that is the application's job.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Backend that issued the request
    pub client: &'static str,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Destination locator
    pub url: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(client: &'static str, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client,
            method: method.into(),
            url: url.into(),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: Option<usize>) -> Self {
        self.body_size = size;
        self
    }

    /// Log request being sent
    pub fn log_request(&self, timeout: Duration) {
        debug!(
            client = self.client,
            method = %self.method,
            url = %self.url,
            body_size = self.body_size,
            timeout_ms = timeout.as_millis(),
            "Sending HTTP request"
        );
    }

    /// Log a request that lost the race against its timer
    pub fn log_timeout(&self, timeout: Duration) {
        warn!(
            client = self.client,
            method = %self.method,
            url = %self.url,
            timeout_ms = timeout.as_millis(),
            "HTTP request timed out"
        );
    }

    /// Log a failure surfaced by the backend
    pub fn log_error(&self, elapsed: Duration, error: &str) {
        warn!(
            client = self.client,
            method = %self.method,
            url = %self.url,
            elapsed_ms = elapsed.as_millis(),
            error = %error,
            "HTTP request failed"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Number of normalized response headers
    pub header_count: usize,
    /// Time elapsed until the response settled
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            header_count: 0,
            elapsed,
        }
    }

    /// Set the number of response headers
    pub fn with_header_count(mut self, count: usize) -> Self {
        self.header_count = count;
        self
    }

    /// Log successful response
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            client = request.client,
            method = %request.method,
            url = %request.url,
            status = self.status,
            headers = self.header_count,
            elapsed_ms = self.elapsed.as_millis(),
            "HTTP request succeeded"
        );
    }
}

/// Timer for measuring request duration
///
/// Uses the tokio clock so paused-time tests see deterministic values.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
