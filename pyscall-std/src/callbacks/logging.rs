//! Logging wrapper for callback observation.

use pyscall_core::{Args, CallResult, Callback, FunctionName};

/// A callback wrapper that logs invocations and outcomes.
///
/// Without the `tracing` feature this is a plain passthrough.
pub struct LoggingCallback<C> {
    inner: C,
    name: FunctionName,
}

impl<C> LoggingCallback<C> {
    /// Wrap `inner`, logging under `name`.
    pub fn new(name: impl Into<FunctionName>, inner: C) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }

    /// The name used in log records.
    pub fn name(&self) -> &FunctionName {
        &self.name
    }
}

impl<C: Callback> Callback for LoggingCallback<C> {
    async fn call(&self, args: Args) -> CallResult {
        #[cfg(feature = "tracing")]
        tracing::debug!(name = %self.name, args = args.len(), "invoking callback");

        let result = self.inner.call(args).await;

        #[cfg(feature = "tracing")]
        {
            match &result {
                Ok(value) => {
                    tracing::debug!(name = %self.name, has_value = value.is_some(), "callback returned");
                }
                Err(error) => tracing::warn!(name = %self.name, %error, "callback failed"),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscall_core::callback_fn;
    use serde_json::json;

    #[tokio::test]
    async fn test_logging_is_transparent() {
        let cb = LoggingCallback::new("echo", callback_fn(|args: Args| args.into_iter().next()));
        assert_eq!(cb.name().as_str(), "echo");

        let out = cb.call(vec![json!(7)]).await.unwrap();
        assert_eq!(out, Some(json!(7)));
    }
}
