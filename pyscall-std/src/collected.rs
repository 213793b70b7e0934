//! # Collected Callbacks
//!
//! Callbacks declared at compile time and installed in one step.
//!
//! Functions annotated with `#[pyscall::callback]` submit a
//! [`CallbackRegistration`] to `inventory`; [`DeferredRegistry::register_collected`]
//! installs every submitted callback under its declared name, exactly as if
//! loaded code had called `set_callback` for each one.
//!
//! # Example
//!
//! ```rust,ignore
//! #[pyscall::callback]
//! fn update_output(value: String) -> String {
//!     format!("selected: {value}")
//! }
//!
//! let installed = registry.register_collected();
//! ```

use crate::registry::DeferredRegistry;
use futures::future::BoxFuture;
use pyscall_core::{ArgumentError, CallResult, FunctionName, Value};
use serde_json::from_value;
use std::vec::IntoIter;

/// A compile-time callback declaration.
pub struct CallbackRegistration {
    /// The dispatch name.
    pub name: &'static str,
    /// The type-erased entry point.
    pub handler: fn(Vec<Value>) -> BoxFuture<'static, CallResult>,
}

impl CallbackRegistration {
    /// Create a registration.
    pub const fn new(
        name: &'static str,
        handler: fn(Vec<Value>) -> BoxFuture<'static, CallResult>,
    ) -> Self {
        Self { name, handler }
    }
}

inventory::collect!(CallbackRegistration);

impl DeferredRegistry {
    /// Install every collected callback, returning the names installed.
    ///
    /// Names that already hold a callback keep it, as with any repeated
    /// registration.
    pub fn register_collected(&self) -> Vec<FunctionName> {
        let mut names = Vec::new();
        for registration in inventory::iter::<CallbackRegistration> {
            self.set_callback(registration.name, registration.handler);
            names.push(FunctionName::from(registration.name));
        }
        #[cfg(feature = "tracing")]
        tracing::info!(count = names.len(), "installed collected callbacks");
        names
    }
}

/// Positional argument decoder used by generated callbacks.
#[doc(hidden)]
pub struct ArgDecoder {
    args: IntoIter<Value>,
    index: usize,
}

impl ArgDecoder {
    #[doc(hidden)]
    pub fn new(args: Vec<Value>) -> Self {
        Self {
            args: args.into_iter(),
            index: 0,
        }
    }

    /// Decode the next argument; a missing argument decodes from `null`.
    #[doc(hidden)]
    pub fn decode<T: serde::de::DeserializeOwned>(
        &mut self,
        name: &'static str,
    ) -> Result<T, ArgumentError> {
        let index = self.index;
        self.index += 1;
        let value = self.args.next().unwrap_or(Value::Null);
        from_value(value).map_err(|source| ArgumentError {
            name,
            index,
            source,
        })
    }
}
