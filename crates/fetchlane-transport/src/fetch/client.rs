//! Fetch-style transport client
//!
//! Implements [`HttpClient`] on top of any injected [`Fetch`] function,
//! enforcing the per-request timeout by racing the call against a timer.

use super::function::{Fetch, FetchInit};
use super::response::FetchHttpClientResponse;
use crate::error::Result;
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use crate::request::RequestDescriptor;
use crate::timeout::{Race, race};
use crate::traits::{HttpClient, HttpClientResponse};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

/// HTTP client that delegates to an injected fetch function.
///
/// The client has no networking of its own. It builds the locator, calls
/// the function once, and races that call against `request.timeout`:
/// - the call settles first: the timer is dropped and the response wrapped
/// - the timer fires first: the call is dropped and a timeout error returned
///
/// Racing works with any function, including ones that cannot be cancelled.
#[derive(Clone)]
pub struct FetchHttpClient<F> {
    fetch: F,
}

impl<F: Fetch> FetchHttpClient<F> {
    /// Create a client around `fetch`
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    /// Get a reference to the injected fetch function
    pub fn fetch(&self) -> &F {
        &self.fetch
    }
}

impl<F> fmt::Debug for FetchHttpClient<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchHttpClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F: Fetch> HttpClient for FetchHttpClient<F> {
    fn client_name(&self) -> &'static str {
        "fetch"
    }

    async fn make_request(
        &self,
        mut request: RequestDescriptor,
    ) -> Result<Box<dyn HttpClientResponse>> {
        let url = request.locator()?;
        let timeout = request.timeout;
        let body = request.take_body();

        let metadata =
            RequestMetadata::new(self.client_name(), request.method.as_str(), url.as_str())
                .with_body_size(body.as_ref().map(Bytes::len));
        metadata.log_request(timeout);

        let init = FetchInit {
            method: request.method,
            headers: request.headers,
            body,
        };

        let timer = RequestTimer::start();
        match race(self.fetch.fetch(url, init), timeout).await {
            Race::Settled(Ok(raw)) => {
                let response = FetchHttpClientResponse::new(raw);
                ResponseMetadata::new(response.status_code(), timer.elapsed())
                    .with_header_count(response.headers().len())
                    .log_success(&metadata);
                Ok(Box::new(response))
            }
            Race::Settled(Err(err)) => {
                metadata.log_error(timer.elapsed(), &err.to_string());
                Err(err)
            }
            Race::TimedOut => {
                metadata.log_timeout(timeout);
                Err(Self::make_timeout_error(timeout))
            }
        }
    }
}
