//! Callback output conversion.

use crate::{
    callback::{CallResult, Value},
    error::BoxError,
};

/// Trait for converting a callback's return into a [`CallResult`].
///
/// # Default Implementations
///
/// - `()` → no value
/// - `Value` → as is
/// - `String`, `&'static str`, `bool`, integers, `f64` → the matching JSON value
/// - `Option<T>` → delegates to `T`, or no value
/// - `Result<T, E>` → delegates to `T` or propagates `E` unmodified
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a pyscall callback",
    label = "missing `IntoCallbackOutput` implementation",
    note = "Return `()`, a `Value`, a primitive, an `Option` or a `Result` of those."
)]
pub trait IntoCallbackOutput {
    /// Convert the output into the dispatch result.
    fn into_output(self) -> CallResult;
}

impl IntoCallbackOutput for () {
    fn into_output(self) -> CallResult {
        Ok(None)
    }
}

impl IntoCallbackOutput for Value {
    fn into_output(self) -> CallResult {
        Ok(Some(self))
    }
}

impl<T: IntoCallbackOutput> IntoCallbackOutput for Option<T> {
    fn into_output(self) -> CallResult {
        match self {
            Some(t) => t.into_output(),
            None => Ok(None),
        }
    }
}

impl<T, E> IntoCallbackOutput for Result<T, E>
where
    T: IntoCallbackOutput,
    E: Into<BoxError>,
{
    fn into_output(self) -> CallResult {
        match self {
            Ok(t) => t.into_output(),
            Err(e) => Err(e.into()),
        }
    }
}

macro_rules! impl_into_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoCallbackOutput for $ty {
                fn into_output(self) -> CallResult {
                    Ok(Some(Value::from(self)))
                }
            }
        )*
    };
}

impl_into_value!(String, &'static str, bool, i32, i64, u32, u64, f64);
