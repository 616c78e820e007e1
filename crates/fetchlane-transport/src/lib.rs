//! Pluggable HTTP transport for API clients
//!
//! Provides a trait-based transport contract so that an API client can issue
//! requests without knowing which HTTP stack runs underneath. The shipped
//! backend drives any fetch-style request function and enforces per-request
//! timeouts itself.
//!
//! # Architecture
//!
//! - **`HttpClient` trait**: issue one request, get back a settled response
//! - **`HttpClientResponse` trait**: status, headers, and the body as a stream or JSON
//! - **Fetch adapter**: [`FetchHttpClient`] over any [`Fetch`] function
//! - **reqwest fetch**: [`ReqwestFetch`], a ready-made function for native builds
//! - **Error handling**: unified [`TransportError`] across backends

#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! # Usage
//!
//! ```no_run
//! use fetchlane_transport::{FetchHttpClient, HttpClient, ReqwestFetch, RequestDescriptor};
//! use std::time::Duration;
//!
//! # async fn run() -> fetchlane_transport::Result<()> {
//! let client = FetchHttpClient::new(ReqwestFetch::new());
//! let request = RequestDescriptor::new("GET", "api.example.com", "/v1/things")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let response = client.make_request(request).await?;
//! println!("status: {}", response.status_code());
//! let body = response.to_json().await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod headers;
pub mod observability;
pub mod request;
pub mod traits;

mod timeout;


// Re-export commonly used types
pub use config::{DEFAULT_TIMEOUT, TransportConfig};
pub use error::{CONNECTION_CLOSED_ERROR_CODES, Result, TIMEOUT_ERROR_CODE, TransportError};
pub use fetch::{
    ByteStream, Fetch, FetchBody, FetchHttpClient, FetchHttpClientResponse, FetchInit,
    FetchResponse, ReqwestFetch,
};
pub use headers::ResponseHeaders;
pub use request::{Protocol, RequestDescriptor};
pub use traits::{HttpClient, HttpClientResponse, StreamStartedCallback, make_timeout_error};
