//! Testing utilities for pyscall.
//!
//! This module provides callbacks that make dispatch behaviour easy to observe.
//!
//! # Features
//!
//! - [`RecordingCallback`]: records every argument list and returns a fixed value
//! - [`CountingCallback`]: counts invocations
//! - [`FailingCallback`]: always fails with a fixed message
//!
//! For an inspectable document see [`MemoryDocument`](crate::document::MemoryDocument).

use pyscall_core::{Args, BoxError, CallResult, Callback, Value};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Callback
// ============================================================================

/// A callback that records the arguments of every call.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingCallback::returning(json!("ok"));
/// registry.set_callback("f", recorder.clone());
///
/// registry.call("f", vec![json!(1)]).await?;
/// assert_eq!(recorder.calls(), vec![vec![json!(1)]]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingCallback {
    calls: Arc<Mutex<Vec<Args>>>,
    result: Option<Value>,
}

impl RecordingCallback {
    /// Create a recording callback that returns no value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording callback that returns `value`.
    pub fn returning(value: Value) -> Self {
        Self {
            calls: Arc::default(),
            result: Some(value),
        }
    }

    /// Get a clone of the recorded argument lists.
    pub fn calls(&self) -> Vec<Args> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Callback for RecordingCallback {
    async fn call(&self, args: Args) -> CallResult {
        self.calls.lock().unwrap().push(args);
        Ok(self.result.clone())
    }
}

// ============================================================================
// Counting Callback
// ============================================================================

/// A callback that counts invocations and returns the running count.
#[derive(Clone, Default)]
pub struct CountingCallback {
    count: Arc<AtomicUsize>,
}

impl CountingCallback {
    /// Create a new counting callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Callback for CountingCallback {
    async fn call(&self, _args: Args) -> CallResult {
        let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(Value::from(n)))
    }
}

// ============================================================================
// Failing Callback
// ============================================================================

/// A callback that always fails.
#[derive(Clone, Debug)]
pub struct FailingCallback {
    message: String,
}

impl FailingCallback {
    /// Create a callback failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Callback for FailingCallback {
    async fn call(&self, _args: Args) -> CallResult {
        Err(BoxError::from(self.message.clone()))
    }
}
