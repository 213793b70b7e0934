//! # Callbacks
//!
//! The handlers registered under a [`FunctionName`] by loaded code.
//!
//! A callback receives the caller's positional arguments as an ordered list of
//! opaque [`Value`]s and produces at most one value. What the values mean is
//! entirely up to the callback and its caller.
//!
//! # Usage Patterns
//!
//! 1. **Async closure**: `|args: Args| async move { ... }`
//! 2. **Sync closure**: `callback_fn(|args: Args| ...)`
//! 3. **Struct implementation**: `impl Callback for MyCallback`
//!
//! [`FunctionName`]: crate::FunctionName

use crate::{error::BoxError, output::IntoCallbackOutput};
use std::{future::Future, pin::Pin, sync::Arc};

/// An opaque argument or result value.
pub type Value = serde_json::Value;

/// Ordered positional arguments of a call.
pub type Args = Vec<Value>;

/// The outcome of invoking a callback: a value, no value, or the callback's own error.
pub type CallResult = Result<Option<Value>, BoxError>;

/// A handler that can be dispatched to by name.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for zero-cost static dispatch.
/// Registries store callbacks behind [`DynCallback`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a pyscall Callback",
    label = "missing `Callback` implementation",
    note = "Callbacks take `Args` and return something implementing `IntoCallbackOutput`; wrap sync closures with `callback_fn`."
)]
pub trait Callback: Send + Sync + 'static {
    /// Invokes the callback.
    fn call(&self, args: Args) -> impl Future<Output = CallResult> + Send;
}

/// Dynamic object-safe version of [`Callback`].
pub trait DynCallback: Send + Sync + 'static {
    /// Invokes the callback (dynamic dispatch version).
    fn call_dyn(&self, args: Args) -> Pin<Box<dyn Future<Output = CallResult> + Send + '_>>;
}

/// A shared, type-erased callback.
pub type BoxCallback = Arc<dyn DynCallback>;

// Blanket implementation: Any type implementing Callback implements DynCallback automatically.
impl<T: Callback> DynCallback for T {
    fn call_dyn(&self, args: Args) -> Pin<Box<dyn Future<Output = CallResult> + Send + '_>> {
        Box::pin(self.call(args))
    }
}

// Blanket impl for async closures
impl<F, Fut, R> Callback for F
where
    F: Fn(Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoCallbackOutput,
{
    fn call(&self, args: Args) -> impl Future<Output = CallResult> + Send {
        let fut = (self)(args);
        async move { fut.await.into_output() }
    }
}

/// A synchronous closure used as a callback.
///
/// Created with [`callback_fn`].
#[derive(Clone, Copy)]
pub struct SyncCallback<F>(F);

impl<F> SyncCallback<F> {
    /// Wrap a synchronous closure.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> std::fmt::Debug for SyncCallback<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCallback").finish_non_exhaustive()
    }
}

impl<F, R> Callback for SyncCallback<F>
where
    F: Fn(Args) -> R + Send + Sync + 'static,
    R: IntoCallbackOutput,
{
    async fn call(&self, args: Args) -> CallResult {
        (self.0)(args).into_output()
    }
}

/// Wrap a synchronous closure as a [`Callback`].
///
/// # Example
///
/// ```rust,ignore
/// registry.set_callback("greet", callback_fn(|args: Args| {
///     format!("hello {}", args[0])
/// }));
/// ```
pub const fn callback_fn<F>(f: F) -> SyncCallback<F> {
    SyncCallback::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn invoke(cb: &dyn DynCallback, args: Args) -> CallResult {
        cb.call_dyn(args).await
    }

    #[tokio::test]
    async fn test_async_closure_is_callback() {
        let cb = |args: Args| async move { args.len() as i64 };
        let out = invoke(&cb, vec![json!(1), json!(2)]).await.unwrap();
        assert_eq!(out, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_sync_closure_via_callback_fn() {
        let cb = callback_fn(|args: Args| args.into_iter().next());
        let out = invoke(&cb, vec![json!("a")]).await.unwrap();
        assert_eq!(out, Some(json!("a")));

        let out = invoke(&cb, vec![]).await.unwrap();
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn test_unit_output_is_no_value() {
        let cb = callback_fn(|_args: Args| ());
        assert_eq!(invoke(&cb, vec![]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_error_passes_through_unwrapped() {
        let cb = callback_fn(|_args: Args| -> Result<Value, std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
        });
        let err = invoke(&cb, vec![]).await.unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().expect("io error");
        assert_eq!(io.to_string(), "boom");
    }
}
