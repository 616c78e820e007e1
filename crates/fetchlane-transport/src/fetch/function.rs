//! The injected request function
//!
//! [`Fetch`] is the only thing a fetch-style backend has to provide: given a
//! locator and a [`FetchInit`], produce a [`FetchResponse`]. Any closure of
//! the right shape qualifies, which is how tests substitute fakes.

use crate::error::{Result, TransportError};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt, stream};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use url::Url;

/// A response body delivered as a sequence of byte chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Request options handed to the fetch function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchInit {
    /// HTTP method, as supplied by the caller
    pub method: String,

    /// Request headers, case as supplied
    pub headers: HashMap<String, String>,

    /// Request body; `None` means no body at all, never an empty one
    pub body: Option<Bytes>,
}

/// A request-issuing function.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Issue one request and return the backend's response.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the backend hit (DNS, connect, TLS, ...).
    /// The adapter passes it to the caller unchanged.
    async fn fetch(&self, url: Url, init: FetchInit) -> Result<FetchResponse>;
}

#[async_trait]
impl<F, Fut> Fetch for F
where
    F: Fn(Url, FetchInit) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResponse>> + Send + 'static,
{
    async fn fetch(&self, url: Url, init: FetchInit) -> Result<FetchResponse> {
        (self)(url, init).await
    }
}

enum BodyRepr {
    Buffered(Bytes),
    Streaming(ByteStream),
}

/// Body of a [`FetchResponse`], either already buffered or still streaming.
pub struct FetchBody {
    repr: BodyRepr,
}

impl FetchBody {
    /// A body with no content
    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    /// A fully buffered body
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            repr: BodyRepr::Buffered(bytes.into()),
        }
    }

    /// A body read chunk by chunk from `stream`
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            repr: BodyRepr::Streaming(Box::pin(stream)),
        }
    }

    /// Whether the body is still backed by a stream
    pub fn is_streaming(&self) -> bool {
        matches!(self.repr, BodyRepr::Streaming(_))
    }

    /// Expose the body as a byte stream without buffering it.
    pub fn into_stream(self) -> ByteStream {
        match self.repr {
            BodyRepr::Streaming(stream) => stream,
            BodyRepr::Buffered(bytes) if bytes.is_empty() => {
                Box::pin(stream::empty::<Result<Bytes>>())
            }
            BodyRepr::Buffered(bytes) => {
                Box::pin(stream::once(async move { Ok::<_, TransportError>(bytes) }))
            }
        }
    }

    /// Read the whole body.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the underlying stream.
    pub async fn bytes(self) -> Result<Bytes> {
        match self.repr {
            BodyRepr::Buffered(bytes) => Ok(bytes),
            BodyRepr::Streaming(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }

    /// Read the whole body and parse it as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TransportError::Parse`] if the body is not valid JSON
    /// for `T`, or the stream's error if reading fails.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl fmt::Debug for FetchBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            BodyRepr::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            BodyRepr::Streaming(_) => f.write_str("Streaming"),
        }
    }
}

impl Default for FetchBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for FetchBody {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for FetchBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for FetchBody {
    fn from(text: String) -> Self {
        Self::from_bytes(text)
    }
}

impl From<&'static str> for FetchBody {
    fn from(text: &'static str) -> Self {
        Self::from_bytes(text)
    }
}

/// What a fetch function returns: status, header pairs in wire order, and a body.
#[derive(Debug, Default)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Header pairs, possibly repeating a name
    pub headers: Vec<(String, String)>,

    /// Response body
    pub body: FetchBody,

    /// Backend-specific extras (protocol version, peer address, ...)
    pub extensions: http::Extensions,
}

impl FetchResponse {
    /// Create a response with the given status and an empty body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Add a header pair
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<FetchBody>) -> Self {
        self.body = body.into();
        self
    }

    /// A response carrying `value` as a JSON body
    pub fn from_json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(value.to_string())
    }

    /// Backend-specific extension of type `T`, if the backend stored one
    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_buffered_body_bytes() {
        let body = FetchBody::from("hello");
        assert!(!body.is_streaming());
        assert_eq!(body.bytes().await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_streaming_body_bytes() {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"{\"a\":")),
            Ok(Bytes::from_static(b"1}")),
        ];
        let body = FetchBody::from_stream(stream::iter(chunks));
        assert!(body.is_streaming());

        let value: serde_json::Value = body.json().await.unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_streaming_body_error_is_returned() {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(TransportError::Body("reset".to_string())),
        ];
        let body = FetchBody::from_stream(stream::iter(chunks));

        assert!(matches!(body.bytes().await, Err(TransportError::Body(_))));
    }

    #[tokio::test]
    async fn test_json_parse_error() {
        let body = FetchBody::from("not json");
        let result = body.json::<serde_json::Value>().await;
        assert!(matches!(result, Err(TransportError::Parse(_))));
    }

    #[tokio::test]
    async fn test_empty_body_streams_nothing() {
        let mut stream = FetchBody::empty().into_stream();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_buffered_body_streams_one_chunk() {
        let chunks: Vec<_> = FetchBody::from(vec![1u8, 2, 3])
            .into_stream()
            .collect()
            .await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().as_ref(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_closure_is_a_fetch_function() {
        let fetch = |url: Url, init: FetchInit| async move {
            Ok::<_, TransportError>(
                FetchResponse::new(200)
                    .with_header("X-Url", url.to_string())
                    .with_header("X-Method", init.method),
            )
        };

        let response = fetch
            .fetch(
                Url::parse("https://api.example.com/v1").unwrap(),
                FetchInit {
                    method: "DELETE".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers,
            vec![
                ("X-Url".to_string(), "https://api.example.com/v1".to_string()),
                ("X-Method".to_string(), "DELETE".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_json_response() {
        let response = FetchResponse::from_json(201, &json!({"id": "ch_1"}));
        assert_eq!(response.status, 201);
        assert_eq!(
            response.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn test_extensions() {
        let mut response = FetchResponse::new(200);
        response.extensions.insert(http::Version::HTTP_2);
        assert_eq!(response.extension::<http::Version>(), Some(&http::Version::HTTP_2));
        assert_eq!(response.extension::<u32>(), None);
    }
}
