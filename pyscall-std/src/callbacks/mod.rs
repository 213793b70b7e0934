//! Standard callback wrappers.
//!
//! Wrappers decorate a callback's own execution. None of them affect how long
//! a call waits for its callback to be registered.

pub mod logging;
#[cfg(feature = "timeout")]
pub mod timeout;

pub use logging::LoggingCallback;
#[cfg(feature = "timeout")]
pub use timeout::{TimeoutCallback, TimeoutError};
