//! Single-resolution, multi-waiter completion signal.

use futures::{
    FutureExt,
    channel::oneshot,
    future::Shared,
};
use std::{
    future::Future,
    sync::{Mutex, PoisonError},
};

/// A signal that is resolved at most once and releases every waiter.
///
/// Resolution is monotonic: once resolved the signal stays resolved, and
/// resolving again is a no-op. Waiters that arrive after resolution complete
/// immediately.
pub struct CompletionSignal {
    sender: Mutex<Option<oneshot::Sender<()>>>,
    receiver: Shared<oneshot::Receiver<()>>,
}

impl CompletionSignal {
    /// Create an unresolved signal.
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            sender: Mutex::new(Some(tx)),
            receiver: rx.shared(),
        }
    }

    /// Resolve the signal.
    ///
    /// Returns `true` if this call performed the resolution.
    pub fn resolve(&self) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(tx) => {
                // The receiver half lives in `self`, so the send cannot fail.
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    /// Whether the signal has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Wait for resolution.
    ///
    /// The returned future does not borrow the signal.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static + use<> {
        let rx = self.receiver.clone();
        async move {
            let _ = rx.await;
        }
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
