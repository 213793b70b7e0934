//! # pyscall-std
//!
//! Standard implementations for the pyscall deferred dispatch runtime.
//!
//! This crate provides:
//! - **Signals**: [`CompletionSignal`]
//! - **Deferred registry**: [`DeferredRegistry`]
//! - **Resource loading**: [`ResourceLoader`]
//! - **Documents**: [`MemoryDocument`], [`HtmlDocument`]
//! - **Standard callbacks**: Logging, Timeout
//! - **Collected callbacks**: `CallbackRegistration` (feature `inventory`)
//!
//! [`CompletionSignal`]: signal::CompletionSignal
//! [`DeferredRegistry`]: registry::DeferredRegistry
//! [`ResourceLoader`]: loader::ResourceLoader
//! [`MemoryDocument`]: document::MemoryDocument
//! [`HtmlDocument`]: document::HtmlDocument

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use pyscall_core;

// Modules
pub mod callbacks;
#[cfg(feature = "inventory")]
pub mod collected;
pub mod document;
pub mod loader;
pub mod registry;
pub mod signal;
pub mod testing;

#[cfg(feature = "inventory")]
pub use inventory;
