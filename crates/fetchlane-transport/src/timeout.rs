//! Racing a call against a timer
//!
//! Backends cannot be assumed to support cancellation, so the timeout is
//! enforced from the outside: the call and a timer are polled together and
//! whichever finishes first decides the outcome. The loser is dropped.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Sleep;

/// Outcome of [`race`].
#[derive(Debug)]
pub(crate) enum Race<T> {
    /// The call settled first
    Settled(T),
    /// The timer fired first
    TimedOut,
}

/// Timer owned by a single in-flight call.
///
/// The deadline is fixed when the timer is created. Dropping the timer
/// cancels it, so every exit path of the owning scope releases it exactly once.
pub(crate) struct PendingTimeout {
    sleep: Pin<Box<Sleep>>,
    duration: Duration,
}

impl PendingTimeout {
    pub(crate) fn start(duration: Duration) -> Self {
        Self {
            sleep: Box::pin(tokio::time::sleep(duration)),
            duration,
        }
    }
}

impl Future for PendingTimeout {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.sleep.as_mut().poll(cx)
    }
}

impl Drop for PendingTimeout {
    fn drop(&mut self) {
        if !self.sleep.is_elapsed() {
            tracing::trace!(
                timeout_ms = self.duration.as_millis(),
                "Cleared pending timeout"
            );
            #[cfg(test)]
            tests::CLEARED.with(|cleared| cleared.set(cleared.get() + 1));
        }
    }
}

/// Poll `call` against a timer of `duration`.
///
/// The timer is armed before `call` is first polled and nothing is awaited
/// in between. When both are ready in the same poll the call wins.
pub(crate) async fn race<F>(call: F, duration: Duration) -> Race<F::Output>
where
    F: Future,
{
    let timer = PendingTimeout::start(duration);

    tokio::select! {
        biased;
        output = call => Race::Settled(output),
        () = timer => Race::TimedOut,
    }
}
