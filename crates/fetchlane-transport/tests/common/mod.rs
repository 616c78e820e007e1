//! Common test utilities and helpers

use async_trait::async_trait;
use fetchlane_transport::{Fetch, FetchInit, FetchResponse, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// A call seen by [`MockFetch`]
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub init: FetchInit,
}

#[derive(Default)]
struct State {
    responses: Mutex<VecDeque<Result<FetchResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Mutex<Option<Duration>>,
    never_settle: AtomicBool,
    completed: AtomicUsize,
    abandoned: AtomicUsize,
}

/// Scriptable fetch function.
///
/// Replies with queued responses in order (a bare `200` once the queue is
/// empty), optionally after a delay, or never. Clones share state, so a test
/// can keep one handle while the client owns another.
#[derive(Clone, Default)]
pub struct MockFetch {
    state: Arc<State>,
}

#[allow(dead_code)]
impl MockFetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply
    pub fn respond_with(self, response: Result<FetchResponse>) -> Self {
        self.state.responses.lock().unwrap().push_back(response);
        self
    }

    /// Wait this long before replying
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.state.delay.lock().unwrap() = Some(delay);
        self
    }

    /// Never reply
    pub fn never_settle(self) -> Self {
        self.state.never_settle.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }

    /// Calls that ran to completion and produced a reply
    pub fn completed(&self) -> usize {
        self.state.completed.load(Ordering::SeqCst)
    }

    /// Calls dropped before they could reply
    pub fn abandoned(&self) -> usize {
        self.state.abandoned.load(Ordering::SeqCst)
    }
}

/// Counts the call as abandoned unless it is disarmed first.
struct InFlight {
    state: Arc<State>,
    armed: bool,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed {
            self.state.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl Fetch for MockFetch {
    async fn fetch(&self, url: Url, init: FetchInit) -> Result<FetchResponse> {
        self.state.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            init,
        });

        let mut guard = InFlight {
            state: self.state.clone(),
            armed: true,
        };

        if self.state.never_settle.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        let delay = *self.state.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        guard.armed = false;
        self.state.completed.fetch_add(1, Ordering::SeqCst);

        let queued = self.state.responses.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| Ok(FetchResponse::new(200)))
    }
}

/// Install a test subscriber so `RUST_LOG` shows transport logs.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
