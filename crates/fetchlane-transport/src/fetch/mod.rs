//! Fetch-style transport
//!
//! Binds the [`HttpClient`](crate::HttpClient) contract to an injected
//! request function. Bring any [`Fetch`] (a closure, [`ReqwestFetch`], a
//! test double) and wrap it in a [`FetchHttpClient`].

pub mod client;
pub mod function;
pub mod reqwest_fetch;
pub mod response;

pub use client::FetchHttpClient;
pub use function::{ByteStream, Fetch, FetchBody, FetchInit, FetchResponse};
pub use reqwest_fetch::ReqwestFetch;
pub use response::FetchHttpClientResponse;
