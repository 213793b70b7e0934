//! # pyscall-core
//!
//! Core vocabulary for the pyscall deferred dispatch runtime.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! document backends and callback providers that don't need the full
//! `pyscall-std` implementation.
//!
//! # Moving Parts
//!
//! The runtime bridges two asynchronous worlds: resources injected into a
//! document load and execute on their own schedule, while page callers may
//! invoke a named function at any moment. The core types describe both sides.
//!
//! ## Names and Callbacks ([`FunctionName`], [`Callback`])
//!
//! A [`FunctionName`] identifies one dispatch slot. Loaded code registers a
//! [`Callback`] under that name; callers dispatch [`Args`] to it and receive a
//! [`CallResult`].
//!
//! - **Opaque values**: arguments and results are [`Value`]s, never interpreted
//! - **Async or sync**: closures returning futures are callbacks directly,
//!   synchronous closures go through [`callback_fn`]
//! - **Flexible output**: anything implementing [`IntoCallbackOutput`]
//!
//! ## Resources ([`ResourceIdentity`], [`ResourceKind`], [`ConfigPayload`])
//!
//! Scripts and inline code are injected once per identity, tagged with an
//! allow-listed kind and an opaque configuration payload.
//!
//! ## Documents ([`Document`], [`Element`])
//!
//! The injection target. Backends decide what "append an element" means:
//! recording, rendering markup, or mutating a live page.
//!
//! # Error Types
//!
//! - [`PyscallError`] - Top-level error type
//! - [`LoadError`] - Resource injection errors
//! - [`ManifestError`] - Runtime manifest errors
//! - [`DispatchError`] - Namespace dispatch errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
mod element;
mod error;
mod name;
mod output;
mod resource;

// Re-exports
pub use callback::{
    Args, BoxCallback, CallResult, Callback, DynCallback, SyncCallback, Value, callback_fn,
};
pub use element::{Document, Element, Placement};
pub use error::{
    ArgumentError, BoxError, DispatchError, LoadError, ManifestError, PyscallError,
};
pub use name::FunctionName;
pub use output::IntoCallbackOutput;
pub use resource::{ConfigPayload, ResourceIdentity, ResourceKind};
