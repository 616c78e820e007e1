//! Transport and response contracts
//!
//! Every backend implements [`HttpClient`]; every response it hands back
//! implements [`HttpClientResponse`]. Callers hold `Arc<dyn HttpClient>` and
//! never see which backend is underneath.

use crate::error::{Result, TransportError};
use crate::fetch::ByteStream;
use crate::headers::ResponseHeaders;
use crate::request::RequestDescriptor;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::time::Duration;

/// Callback fired once the response metadata is final.
pub type StreamStartedCallback = Box<dyn FnOnce() + Send>;

/// Build the canonical timeout error.
///
/// All adapters signal timeouts through this function so callers can rely
/// on [`TransportError::is_timeout`] regardless of backend.
pub fn make_timeout_error(timeout: Duration) -> TransportError {
    TransportError::Timeout(timeout)
}

/// A backend able to issue HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync + fmt::Debug {
    /// Short name identifying the backend kind (e.g. `"fetch"`).
    fn client_name(&self) -> &'static str;

    /// Issue exactly one request and wait for it to settle or time out.
    ///
    /// # Errors
    ///
    /// - [`TransportError::InvalidRequest`] / [`TransportError::InvalidUrl`]
    ///   if the descriptor is rejected; nothing is sent in that case
    /// - [`TransportError::Timeout`] if `request.timeout` elapses first
    /// - the backend's own failure, unchanged, if the call fails
    async fn make_request(&self, request: RequestDescriptor)
    -> Result<Box<dyn HttpClientResponse>>;

    /// The canonical timeout error for this backend.
    fn make_timeout_error(timeout: Duration) -> TransportError
    where
        Self: Sized,
    {
        make_timeout_error(timeout)
    }
}

/// A settled response.
///
/// Status and headers are available without waiting. The body is consumed
/// either as a stream ([`to_stream`](Self::to_stream)) or parsed whole
/// ([`to_json`](Self::to_json)); both take the response by value.
#[async_trait]
pub trait HttpClientResponse: Send + fmt::Debug {
    /// HTTP status code
    fn status_code(&self) -> u16;

    /// Normalized response headers
    fn headers(&self) -> &ResponseHeaders;

    /// The backend's own response object, for downcasting.
    fn raw_response(&self) -> &dyn Any;

    /// Expose the body as a byte stream.
    ///
    /// `on_stream_started` fires exactly once, before the stream yields its
    /// first chunk. It signals that status and headers are final, not that
    /// the body has been read.
    fn to_stream(self: Box<Self>, on_stream_started: StreamStartedCallback) -> ByteStream;

    /// Read the whole body and parse it as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Parse`] if the body is not valid JSON.
    async fn to_json(self: Box<Self>) -> Result<serde_json::Value>;
}

impl dyn HttpClientResponse {
    /// Read the whole body and deserialize it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Parse`] if the body is not valid JSON or
    /// does not match `T`.
    pub async fn into_json<T: DeserializeOwned>(self: Box<Self>) -> Result<T> {
        let value = self.to_json().await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Downcast the raw response to a concrete backend type.
    pub fn raw_as<T: Any>(&self) -> Option<&T> {
        self.raw_response().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NullClient;

    #[async_trait]
    impl HttpClient for NullClient {
        fn client_name(&self) -> &'static str {
            "null"
        }

        async fn make_request(
            &self,
            request: RequestDescriptor,
        ) -> Result<Box<dyn HttpClientResponse>> {
            Err(Self::make_timeout_error(request.timeout))
        }
    }

    #[test]
    fn test_make_timeout_error_is_canonical() {
        let err = make_timeout_error(Duration::from_millis(30));
        assert!(err.is_timeout());
        assert_eq!(err.code(), Some(crate::error::TIMEOUT_ERROR_CODE));

        let from_trait = NullClient::make_timeout_error(Duration::from_millis(30));
        assert!(matches!(from_trait, TransportError::Timeout(d) if d == Duration::from_millis(30)));
    }

    #[tokio::test]
    async fn test_trait_object_usage() {
        let client: std::sync::Arc<dyn HttpClient> = std::sync::Arc::new(NullClient);
        assert_eq!(client.client_name(), "null");

        let request = RequestDescriptor::new("GET", "api.example.com", "/")
            .with_timeout(Duration::from_secs(1));
        let err = client.make_request(request).await.unwrap_err();
        assert!(err.is_timeout());
    }
}
