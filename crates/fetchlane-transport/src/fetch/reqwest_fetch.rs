//! reqwest-backed fetch function
//!
//! [`ReqwestFetch`] is the stock [`Fetch`] for native builds. It is injected
//! like any other function; nothing in the adapter depends on it.

use super::function::{Fetch, FetchBody, FetchInit, FetchResponse};
use crate::error::{Result, TransportError};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as ReqwestClient;
use url::Url;

/// [`Fetch`] implementation over a `reqwest::Client`.
///
/// No timeout is configured on the client: the adapter enforces timeouts.
/// The response body is streamed, never buffered here. The negotiated HTTP
/// version and the peer address are stored in
/// [`FetchResponse::extensions`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetch {
    client: ReqwestClient,
}

impl ReqwestFetch {
    /// Create a fetch function with a default reqwest client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetch function around an existing reqwest client
    pub fn with_client(client: ReqwestClient) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest client
    pub fn client(&self) -> &ReqwestClient {
        &self.client
    }
}

#[async_trait]
impl Fetch for ReqwestFetch {
    async fn fetch(&self, url: Url, init: FetchInit) -> Result<FetchResponse> {
        let method = reqwest::Method::from_bytes(init.method.as_bytes()).map_err(|e| {
            TransportError::InvalidRequest(format!("invalid HTTP method '{}': {e}", init.method))
        })?;

        let mut req = self.client.request(method, url);

        for (key, value) in &init.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = init.body {
            req = req.body(body);
        }

        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(key, value)| (key.to_string(), latin1(value.as_bytes())))
            .collect();

        let mut extensions = http::Extensions::new();
        extensions.insert(response.version());
        if let Some(addr) = response.remote_addr() {
            extensions.insert(addr);
        }

        let body = FetchBody::from_stream(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(TransportError::from)),
        );

        Ok(FetchResponse {
            status,
            headers,
            body,
            extensions,
        })
    }
}

/// Decode a header value byte for byte, the way fetch builds a `ByteString`.
///
/// Every byte maps to the code point of the same value, so no header value is
/// ever rejected.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
