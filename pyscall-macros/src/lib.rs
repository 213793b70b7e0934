//! Procedural macros for pyscall.
//!
//! - `#[callback]` - register a function as a dispatch callback under its own name

use proc_macro::TokenStream;

mod callback;

/// Register a function as a pyscall callback.
///
/// The function is kept as written. Alongside it the macro generates an
/// entry point that decodes positional arguments into the parameter types and
/// submits it for collection, so that `DeferredRegistry::register_collected`
/// installs it under the function's name.
///
/// Parameters must be owned types implementing `serde::Deserialize`. Missing
/// trailing arguments decode from `null`, so `Option<T>` parameters are
/// optional. The return type must implement `IntoCallbackOutput`.
///
/// # Usage
///
/// ```rust,ignore
/// // Registered as "update_output"
/// #[pyscall::callback]
/// fn update_output(value: String) -> String {
///     format!("selected: {value}")
/// }
///
/// // Async, registered under an explicit name
/// #[pyscall::callback(name = "fetch")]
/// async fn fetch_rows(table: String, limit: Option<u32>) -> Result<Value, MyError> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn callback(attr: TokenStream, item: TokenStream) -> TokenStream {
    callback::callback_impl(attr, item)
}
