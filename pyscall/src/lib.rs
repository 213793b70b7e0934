//! # pyscall - Deferred Callback Dispatch for Loaded Scripts
//!
//! `pyscall` exposes named functions to page callers before the code that
//! implements them has even loaded. Calls wait for their callback; loaded code
//! registers callbacks whenever it gets around to it. Neither side polls, and
//! no call is dropped.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pyscall::{Bootstrap, RuntimeManifest, documents::MemoryDocument};
//!
//! let manifest = RuntimeManifest::builder()
//!     .script("/assets/callback.py", "{}", "mpy")
//!     .function("update_output")
//!     .build()?;
//!
//! let runtime = Bootstrap::new(manifest, MemoryDocument::new()).run()?;
//!
//! // May be called before the script has registered anything.
//! let pending = runtime.namespace().call("update_output", vec![json!("a")])?;
//!
//! // Later, from the loaded script:
//! runtime.set_callback("update_output", callback_fn(|args: Args| args[0].clone()));
//!
//! let value = pending.await?;
//! ```
//!
//! ## Known Limitation
//!
//! A call to a name that is never registered stays pending. There is no
//! built-in timeout for the wait.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bootstrap;
mod manifest;
mod namespace;
mod runtime;

pub use bootstrap::Bootstrap;
pub use manifest::{
    BaseRuntime, DEFAULT_RUNTIME_VERSION, ResourceEntry, RuntimeManifest, RuntimeManifestBuilder,
};
pub use namespace::{IntoFunctionNames, Namespace, Stub};
pub use runtime::Runtime;

pub use pyscall_core::{
    // Errors
    ArgumentError,
    // Callbacks
    Args,
    BoxCallback,
    BoxError,
    CallResult,
    Callback,
    // Resources
    ConfigPayload,
    DispatchError,
    // Documents
    Document,
    DynCallback,
    Element,
    // Names
    FunctionName,
    IntoCallbackOutput,
    LoadError,
    ManifestError,
    Placement,
    PyscallError,
    ResourceIdentity,
    ResourceKind,
    SyncCallback,
    Value,
    callback_fn,
};

pub use pyscall_std::{
    loader::{Injection, ResourceLoader},
    registry::DeferredRegistry,
    signal::CompletionSignal,
};

/// Document backends.
pub mod documents {
    pub use pyscall_std::document::{HtmlDocument, MemoryDocument};
}

/// Standard callback wrappers.
pub mod callbacks {
    #![allow(clippy::wildcard_imports)]
    pub use pyscall_std::callbacks::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use pyscall_std::testing::*;
}

/// Prelude module - common imports for pyscall.
///
/// # Usage
///
/// ```rust,ignore
/// use pyscall::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Args, Bootstrap, BoxError, CallResult, Callback, ConfigPayload, FunctionName,
        IntoCallbackOutput, PyscallError, ResourceKind, Runtime, RuntimeManifest, Value,
        callback_fn,
    };
}

#[cfg(feature = "macros")]
pub use pyscall_macros::callback;

#[cfg(feature = "inventory")]
pub use inventory;

#[doc(hidden)]
#[cfg(feature = "inventory")]
pub mod __private {
    pub use futures::future::BoxFuture;
    pub use pyscall_std::collected::{ArgDecoder, CallbackRegistration};
}
