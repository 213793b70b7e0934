//! Timeout wrapper for time-limited callback execution.

use pyscall_core::{Args, CallResult, Callback};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Error returned when a callback does not finish in time.
#[derive(Debug, Clone, Error)]
#[error("callback execution timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// A callback wrapper bounding the wrapped callback's execution time.
///
/// The bound starts when the callback is invoked. Waiting for the callback to
/// be registered is not covered.
pub struct TimeoutCallback<C> {
    inner: C,
    duration: Duration,
}

impl<C> TimeoutCallback<C> {
    /// Create a new timeout wrapper.
    pub fn new(inner: C, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<C: Callback> Callback for TimeoutCallback<C> {
    async fn call(&self, args: Args) -> CallResult {
        match timeout(self.duration, self.inner.call(args)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError(self.duration))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_slow_callback_times_out() {
        let slow = |_args: Args| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        };
        let cb = TimeoutCallback::new(slow, Duration::from_millis(10));
        let err = cb.call(vec![]).await.unwrap_err();
        assert!(err.downcast_ref::<TimeoutError>().is_some());
    }

    #[tokio::test]
    async fn test_fast_callback_passes() {
        let cb = TimeoutCallback::new(|_args: Args| async { "done" }, Duration::from_secs(1));
        assert!(cb.call(vec![]).await.unwrap().is_some());
    }
}
