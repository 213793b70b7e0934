//! Error types for pyscall.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`PyscallError`] - Top-level error type for all pyscall operations
//! - [`LoadError`] - Errors while injecting resources into a document
//! - [`ManifestError`] - Errors in the runtime manifest
//! - [`DispatchError`] - Errors while dispatching through the namespace
//! - [`ArgumentError`] - A positional argument could not be decoded
//!
//! Errors raised by a callback itself are never wrapped: they reach the
//! caller as the [`BoxError`] the callback produced.

use crate::name::FunctionName;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all pyscall operations.
#[derive(Error, Debug)]
pub enum PyscallError {
    /// A resource could not be injected.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// The runtime manifest is malformed.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// A dispatch through the namespace failed.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur while injecting a resource.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The resource kind is not in the allow-list.
    #[error("invalid type: {kind}. Supported types are: {}", supported.join(", "))]
    InvalidKind {
        /// The rejected kind.
        kind: String,
        /// The allow-list.
        supported: &'static [&'static str],
    },

    /// The configuration payload could not be stringified.
    #[error("config payload could not be serialized")]
    Config(#[source] serde_json::Error),
}

/// Errors that can occur while reading or building a runtime manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest payload is not valid JSON for the expected shape.
    #[error("manifest could not be parsed")]
    Parse(#[source] serde_json::Error),

    /// The manifest could not be serialized.
    #[error("manifest could not be serialized")]
    Serialize(#[source] serde_json::Error),

    /// A required field is missing.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A declared function name is empty.
    #[error("function names must not be empty")]
    EmptyName,
}

/// Errors that can occur while dispatching through the namespace.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No stub is exposed under the name.
    #[error("no function exposed under name: {0}")]
    NotExposed(FunctionName),
}

/// A positional argument could not be decoded into the parameter type.
#[derive(Error, Debug)]
#[error("argument {index} (`{name}`) could not be decoded")]
pub struct ArgumentError {
    /// Parameter name.
    pub name: &'static str,
    /// Zero-based position in the argument list.
    pub index: usize,
    /// Underlying decode failure.
    #[source]
    pub source: serde_json::Error,
}

// Convenience conversions
impl From<BoxError> for PyscallError {
    fn from(err: BoxError) -> Self {
        PyscallError::Custom(err)
    }
}

impl From<std::convert::Infallible> for LoadError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_kind_message_lists_allow_list() {
        let err = LoadError::InvalidKind {
            kind: "js".to_string(),
            supported: &["py", "mpy"],
        };
        assert_eq!(err.to_string(), "invalid type: js. Supported types are: py, mpy");
    }

    #[test]
    fn test_top_level_wraps_load_error() {
        let err: PyscallError = LoadError::InvalidKind {
            kind: "x".to_string(),
            supported: &["py"],
        }
        .into();
        assert!(matches!(err, PyscallError::Load(_)));
    }
}
