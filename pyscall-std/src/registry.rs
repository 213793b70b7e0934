//! # Deferred Registry
//!
//! Per-name slots pairing a [`CompletionSignal`] with at most one callback.
//!
//! Calls and registrations may arrive in any order. A call waits on its
//! name's signal; a registration stores the callback (first one wins) and
//! resolves the signal, releasing every waiting call.
//!
//! # Known Limitation
//!
//! There is no timeout or cancellation for the wait. A call to a name that is
//! never registered stays pending for as long as it is polled.

use crate::signal::CompletionSignal;
use pyscall_core::{Args, BoxCallback, CallResult, Callback, FunctionName};
use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

/// One function name's dispatch state.
#[derive(Default)]
struct Slot {
    signal: CompletionSignal,
    callback: OnceLock<BoxCallback>,
}

/// Registry of deferred callbacks keyed by [`FunctionName`].
///
/// Slots are created lazily on first reference and never removed.
#[derive(Default)]
pub struct DeferredRegistry {
    slots: Mutex<HashMap<FunctionName, Arc<Slot>>>,
}

impl DeferredRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, name: &str) -> Option<Arc<Slot>> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn ensure(&self, name: &FunctionName) -> Arc<Slot> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(name.as_str()) {
            return slot.clone();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(name = %name, "creating dispatch slot");
        let slot = Arc::new(Slot::default());
        slots.insert(name.clone(), slot.clone());
        slot
    }

    /// Create the slot for `name` if absent.
    pub fn ensure_slot(&self, name: impl Into<FunctionName>) {
        self.ensure(&name.into());
    }

    /// Register a callback for `name` and mark the name ready.
    ///
    /// Only the first callback registered for a name is kept; later ones are
    /// dropped. The name's signal is resolved either way.
    pub fn set_callback<C: Callback>(&self, name: impl Into<FunctionName>, callback: C) {
        self.install(name.into(), Some(Arc::new(callback)));
    }

    /// Register an already type-erased callback.
    pub fn set_boxed(&self, name: impl Into<FunctionName>, callback: BoxCallback) {
        self.install(name.into(), Some(callback));
    }

    /// Mark `name` ready without registering a callback.
    ///
    /// Calls to `name` then complete with no value unless a callback is
    /// registered later and wins the slot first.
    pub fn set_ready(&self, name: impl Into<FunctionName>) {
        self.install(name.into(), None);
    }

    fn install(&self, name: FunctionName, callback: Option<BoxCallback>) {
        let slot = self.ensure(&name);
        if let Some(callback) = callback {
            match slot.callback.set(callback) {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(name = %name, "callback registered");
                }
                Err(_ignored) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(name = %name, "callback already registered, keeping the first");
                }
            }
        }
        let released = slot.signal.resolve();
        #[cfg(feature = "tracing")]
        {
            if released {
                tracing::trace!(name = %name, "releasing waiting calls");
            }
        }
        #[cfg(not(feature = "tracing"))]
        let _ = (name, released);
    }

    /// Whether a callback is stored for `name`.
    pub fn has_callback(&self, name: &str) -> bool {
        self.slot(name)
            .is_some_and(|slot| slot.callback.get().is_some())
    }

    /// Whether `name` has been marked ready.
    pub fn is_ready(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|slot| slot.signal.is_resolved())
    }

    /// All names that have a slot, sorted.
    pub fn names(&self) -> Vec<FunctionName> {
        let mut names: Vec<_> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Dispatch a call to `name`.
    ///
    /// The slot is created immediately; the returned future waits until the
    /// name is ready, then invokes the stored callback with `args`. A ready
    /// name without a callback yields `Ok(None)`. Errors from the callback
    /// are returned as they are.
    pub fn call<N>(
        &self,
        name: N,
        args: Args,
    ) -> impl Future<Output = CallResult> + Send + 'static + use<N>
    where
        N: Into<FunctionName>,
    {
        let name = name.into();
        let slot = self.ensure(&name);
        async move {
            #[cfg(feature = "tracing")]
            {
                if !slot.signal.is_resolved() {
                    tracing::trace!(name = %name, "waiting for callback");
                }
            }
            #[cfg(not(feature = "tracing"))]
            let _ = name;
            slot.signal.wait().await;
            match slot.callback.get() {
                Some(callback) => callback.call_dyn(args).await,
                None => Ok(None),
            }
        }
    }
}

impl std::fmt::Debug for DeferredRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscall_core::{Value, callback_fn};
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    fn concat() -> impl Callback {
        callback_fn(|args: Args| {
            args.iter()
                .map(|v| v.as_str().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
                .join("")
        })
    }

    #[tokio::test]
    async fn test_register_then_call() {
        let registry = DeferredRegistry::new();
        registry.set_callback("join", concat());

        let out = registry
            .call("join", vec![json!("a"), json!("b")])
            .await
            .unwrap();
        assert_eq!(out, Some(json!("ab")));
    }

    #[tokio::test]
    async fn test_call_then_register() {
        let registry = DeferredRegistry::new();
        let pending = registry.call("join", vec![json!("a"), json!("b")]);

        registry.set_callback("join", concat());

        let out = timeout(Duration::from_millis(100), pending)
            .await
            .expect("call released")
            .unwrap();
        assert_eq!(out, Some(json!("ab")));
    }

    #[tokio::test]
    async fn test_pending_call_does_not_borrow_registry() {
        let registry = DeferredRegistry::new();
        let pending = tokio::spawn(registry.call(String::from("join"), vec![json!("c")]));
        registry.set_callback("join", concat());
        drop(registry);

        let out = timeout(Duration::from_millis(100), pending)
            .await
            .expect("call released")
            .unwrap()
            .unwrap();
        assert_eq!(out, Some(json!("c")));
    }

    #[tokio::test]
    async fn test_unregistered_name_pends() {
        let registry = DeferredRegistry::new();
        let result = timeout(Duration::from_millis(20), registry.call("never", vec![])).await;
        assert!(result.is_err());
        assert!(!registry.is_ready("never"));
    }

    #[tokio::test]
    async fn test_first_registration_wins() {
        let registry = DeferredRegistry::new();
        registry.set_callback("f", callback_fn(|_args: Args| "first"));
        registry.set_callback("f", callback_fn(|_args: Args| "second"));

        let out = registry.call("f", vec![]).await.unwrap();
        assert_eq!(out, Some(json!("first")));
    }

    #[tokio::test]
    async fn test_ready_without_callback_yields_no_value() {
        let registry = DeferredRegistry::new();
        let pending = registry.call("ack", vec![json!(1)]);
        registry.set_ready("ack");

        assert_eq!(pending.await.unwrap(), None);
        assert!(registry.is_ready("ack"));
        assert!(!registry.has_callback("ack"));
    }

    #[tokio::test]
    async fn test_has_callback_is_pure() {
        let registry = DeferredRegistry::new();
        assert!(!registry.has_callback("f"));
        assert!(registry.names().is_empty());

        registry.set_callback("f", callback_fn(|_args: Args| ()));
        assert!(registry.has_callback("f"));
    }

    #[tokio::test]
    async fn test_ensure_slot_is_idempotent() {
        let registry = DeferredRegistry::new();
        registry.ensure_slot("f");
        registry.ensure_slot("f");
        assert_eq!(registry.names(), vec![FunctionName::from("f")]);
        assert!(!registry.is_ready("f"));
    }

    #[tokio::test]
    async fn test_callback_error_is_not_wrapped() {
        let registry = DeferredRegistry::new();
        registry.set_callback(
            "fail",
            callback_fn(|_args: Args| -> Result<Value, std::fmt::Error> { Err(std::fmt::Error) }),
        );

        let err = registry.call("fail", vec![]).await.unwrap_err();
        assert!(err.downcast_ref::<std::fmt::Error>().is_some());
    }
}
