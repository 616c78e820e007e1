//! Response wrapper for fetch-style backends

use super::function::{ByteStream, FetchResponse};
use crate::error::Result;
use crate::headers::ResponseHeaders;
use crate::traits::{HttpClientResponse, StreamStartedCallback};
use async_trait::async_trait;
use std::any::Any;

/// [`HttpClientResponse`] over a [`FetchResponse`].
///
/// Status and headers are copied out and normalized when the wrapper is
/// built; the raw response keeps the body until it is streamed or parsed.
#[derive(Debug)]
pub struct FetchHttpClientResponse {
    status_code: u16,
    headers: ResponseHeaders,
    raw: FetchResponse,
}

impl FetchHttpClientResponse {
    /// Wrap a raw fetch response, normalizing its header pairs.
    pub fn new(raw: FetchResponse) -> Self {
        let headers = ResponseHeaders::from_pairs(raw.headers.iter().cloned());
        Self {
            status_code: raw.status,
            headers,
            raw,
        }
    }

    /// Give back the raw fetch response
    pub fn into_raw(self) -> FetchResponse {
        self.raw
    }
}

#[async_trait]
impl HttpClientResponse for FetchHttpClientResponse {
    fn status_code(&self) -> u16 {
        self.status_code
    }

    fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    fn raw_response(&self) -> &dyn Any {
        &self.raw
    }

    /// Fetch bodies have no "fully drained" event, so the callback fires
    /// right away. Waiting for the real end would mean buffering the body.
    fn to_stream(self: Box<Self>, on_stream_started: StreamStartedCallback) -> ByteStream {
        on_stream_started();
        self.raw.body.into_stream()
    }

    async fn to_json(self: Box<Self>) -> Result<serde_json::Value> {
        self.raw.body.json().await
    }
}
