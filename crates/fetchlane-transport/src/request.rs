//! Request descriptors
//!
//! A [`RequestDescriptor`] carries the structured fields of one outbound call.
//! It is built by the caller, handed to [`crate::HttpClient::make_request`] and
//! consumed there.

use crate::config::DEFAULT_TIMEOUT;
use crate::error::{Result, TransportError};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Connection security, which selects the locator scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TLS (`https`)
    #[default]
    #[serde(alias = "secure")]
    Https,

    /// Plain text (`http`)
    #[serde(alias = "insecure")]
    Http,
}

impl Protocol {
    /// URL scheme for this protocol
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }

    /// Port used when the descriptor does not name one
    pub fn default_port(self) -> u16 {
        match self {
            Self::Https => 443,
            Self::Http => 80,
        }
    }

    /// Whether this is the insecure variant
    pub fn is_insecure(self) -> bool {
        self == Self::Http
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl FromStr for Protocol {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "https" | "secure" => Ok(Self::Https),
            "http" | "insecure" => Ok(Self::Http),
            other => Err(TransportError::InvalidRequest(format!(
                "unknown protocol '{other}'"
            ))),
        }
    }
}

/// Structured description of a single outbound request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Host name or address, without scheme or path
    pub host: String,

    /// Explicit port; `None` uses the protocol default
    pub port: Option<u16>,

    /// Request target, joined onto the host root
    pub path: String,

    /// HTTP method, passed through verbatim
    pub method: String,

    /// Request headers, case as supplied
    pub headers: HashMap<String, String>,

    /// Request payload; empty payloads are sent as no body
    pub request_data: Option<Bytes>,

    /// Scheme selector
    pub protocol: Protocol,

    /// Time allowed for the call to settle
    pub timeout: Duration,
}

impl RequestDescriptor {
    /// Create a descriptor with default protocol, port and timeout.
    pub fn new(
        method: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            path: path.into(),
            method: method.into(),
            headers: HashMap::new(),
            request_data: None,
            protocol: Protocol::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the protocol
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header to the request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.request_data = Some(body.into());
        self
    }

    /// Set the request body from string
    pub fn with_text_body(mut self, text: impl Into<String>) -> Self {
        self.request_data = Some(Bytes::from(text.into()));
        self
    }

    /// Check the descriptor's fields without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] for an empty or malformed
    /// host, port `0`, an empty method, or a zero timeout. A host may not
    /// carry a port or credentials; bracketed IPv6 literals are accepted.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(TransportError::InvalidRequest("host is empty".to_string()));
        }
        if self.host.contains(['/', '?', '#']) || self.host.contains(char::is_whitespace) {
            return Err(TransportError::InvalidRequest(format!(
                "host '{}' must not contain a path, query or whitespace",
                self.host
            )));
        }
        if self.host.contains('@') {
            return Err(TransportError::InvalidRequest(format!(
                "host '{}' must not carry credentials",
                self.host
            )));
        }
        let bracketed = self.host.starts_with('[') && self.host.ends_with(']');
        if !bracketed && self.host.contains(':') {
            return Err(TransportError::InvalidRequest(format!(
                "host '{}' must not carry a port; set it on the descriptor",
                self.host
            )));
        }
        if self.port == Some(0) {
            return Err(TransportError::InvalidRequest("port 0 is not valid".to_string()));
        }
        if self.method.trim().is_empty() {
            return Err(TransportError::InvalidRequest("method is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(TransportError::InvalidRequest(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the destination locator.
    ///
    /// The path is joined onto `{scheme}://{host}/` with URL-join semantics,
    /// then the explicit port (if any) is applied. Default ports are elided
    /// from the serialized form.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is invalid or the locator cannot be
    /// parsed.
    pub fn locator(&self) -> Result<Url> {
        self.validate()?;

        let base = Url::parse(&format!("{}://{}", self.protocol.scheme(), self.host))?;
        let mut url = base.join(&self.path)?;

        if let Some(port) = self.port {
            url.set_port(Some(port)).map_err(|()| {
                TransportError::InvalidRequest(format!("cannot set port {port} on '{url}'"))
            })?;
        }

        Ok(url)
    }

    /// Payload to hand to the fetch function; empty payloads become `None`.
    pub(crate) fn take_body(&mut self) -> Option<Bytes> {
        self.request_data.take().filter(|body| !body.is_empty())
    }
}
