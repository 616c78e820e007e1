//! Configuration for building request descriptors

use crate::error::{Result, TransportError};
use crate::request::{Protocol, RequestDescriptor};
use std::collections::HashMap;
use std::time::Duration;

/// Timeout applied when neither the caller nor the configuration names one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(80);

/// Defaults applied to every request built through [`TransportConfig::request`].
///
/// The transport itself holds no configuration: each [`RequestDescriptor`]
/// is self-contained. This struct only fills descriptors in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Default timeout for requests
    pub timeout: Duration,

    /// Default protocol
    pub protocol: Protocol,

    /// Default port; `None` uses the protocol default
    pub port: Option<u16>,

    /// Headers included with every request unless the request overrides them
    pub default_headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            protocol: Protocol::Https,
            port: None,
            default_headers: HashMap::new(),
        }
    }
}

impl TransportConfig {
    /// Set the default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the default protocol
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the default port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Add a default header
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `FETCHLANE_TIMEOUT_MS` for the request timeout in milliseconds
    /// - `FETCHLANE_PROTOCOL` for the protocol (`https`, `http`, `secure`, `insecure`)
    /// - `FETCHLANE_PORT` for the port
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] if a variable is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        use std::env;

        let mut config = Self::default();

        if let Ok(timeout_str) = env::var("FETCHLANE_TIMEOUT_MS") {
            let timeout_ms = timeout_str.trim().parse::<u64>().map_err(|e| {
                TransportError::InvalidRequest(format!("FETCHLANE_TIMEOUT_MS: {e}"))
            })?;
            if timeout_ms == 0 {
                return Err(TransportError::InvalidRequest(
                    "FETCHLANE_TIMEOUT_MS must be greater than zero".to_string(),
                ));
            }
            config.timeout = Duration::from_millis(timeout_ms);
        }

        if let Ok(protocol) = env::var("FETCHLANE_PROTOCOL") {
            config.protocol = protocol.parse()?;
        }

        if let Ok(port_str) = env::var("FETCHLANE_PORT") {
            let port = port_str
                .trim()
                .parse::<u16>()
                .map_err(|e| TransportError::InvalidRequest(format!("FETCHLANE_PORT: {e}")))?;
            config.port = Some(port);
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    pub fn merge(mut self, other: TransportConfig) -> Self {
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if other.protocol != Protocol::default() {
            self.protocol = other.protocol;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        self.default_headers.extend(other.default_headers);
        self
    }

    /// Build a descriptor pre-filled with these defaults.
    pub fn request(
        &self,
        method: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
    ) -> RequestDescriptor {
        let mut request = RequestDescriptor::new(method, host, path)
            .with_protocol(self.protocol)
            .with_timeout(self.timeout);
        request.port = self.port;
        request.headers = self.default_headers.clone();
        request
    }
}
