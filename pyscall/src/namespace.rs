//! # Dispatch Facade
//!
//! Uniformly named stubs exposed to page callers.
//!
//! Each [`Stub`] forwards its arguments to the [`DeferredRegistry`] and returns
//! the callback's eventual result, so callers never need to know whether the
//! callback has been loaded yet.

use futures::future::BoxFuture;
use pyscall_core::{Args, CallResult, DispatchError, FunctionName};
use pyscall_std::registry::DeferredRegistry;
use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

/// A callable handle for one function name.
///
/// Cloning is cheap; every clone dispatches to the same slot.
#[derive(Clone)]
pub struct Stub {
    name: FunctionName,
    registry: Arc<DeferredRegistry>,
}

impl Stub {
    /// The function name this stub dispatches to.
    pub fn name(&self) -> &FunctionName {
        &self.name
    }

    /// Call the function.
    ///
    /// Resolves once the function is ready and its callback has returned.
    pub fn call(
        &self,
        args: Args,
    ) -> impl Future<Output = CallResult> + Send + 'static + use<> {
        self.registry.call(self.name.clone(), args)
    }

    /// Call the function, returning a boxed future.
    pub fn call_boxed(&self, args: Args) -> BoxFuture<'static, CallResult> {
        Box::pin(self.call(args))
    }
}

impl std::fmt::Debug for Stub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Stub").field(&self.name).finish()
    }
}

/// One or several function names.
pub trait IntoFunctionNames {
    /// Convert into an ordered list of names.
    fn into_function_names(self) -> Vec<FunctionName>;
}

impl IntoFunctionNames for &str {
    fn into_function_names(self) -> Vec<FunctionName> {
        vec![self.into()]
    }
}

impl IntoFunctionNames for String {
    fn into_function_names(self) -> Vec<FunctionName> {
        vec![self.into()]
    }
}

impl IntoFunctionNames for FunctionName {
    fn into_function_names(self) -> Vec<FunctionName> {
        vec![self]
    }
}

impl IntoFunctionNames for &FunctionName {
    fn into_function_names(self) -> Vec<FunctionName> {
        vec![self.clone()]
    }
}

impl<T: Into<FunctionName>> IntoFunctionNames for Vec<T> {
    fn into_function_names(self) -> Vec<FunctionName> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<FunctionName>, const N: usize> IntoFunctionNames for [T; N] {
    fn into_function_names(self) -> Vec<FunctionName> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T> IntoFunctionNames for &[T]
where
    for<'a> &'a T: Into<FunctionName>,
{
    fn into_function_names(self) -> Vec<FunctionName> {
        self.iter().map(Into::into).collect()
    }
}

/// The well-known namespace holding every exposed stub.
pub struct Namespace {
    registry: Arc<DeferredRegistry>,
    stubs: Mutex<HashMap<FunctionName, Stub>>,
}

impl Namespace {
    /// The namespace's fixed name.
    pub const NAME: &'static str = "pyscallback";

    pub(crate) fn new(registry: Arc<DeferredRegistry>) -> Self {
        Self {
            registry,
            stubs: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<FunctionName, Stub>> {
        self.stubs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Expose a stub for each name.
    ///
    /// Exposing a name again replaces its stub with an equivalent one.
    pub fn register_function(&self, names: impl IntoFunctionNames) {
        let mut stubs = self.lock();
        for name in names.into_function_names() {
            #[cfg(feature = "tracing")]
            tracing::debug!(name = %name, namespace = Self::NAME, "exposing stub");
            let stub = Stub {
                name: name.clone(),
                registry: self.registry.clone(),
            };
            stubs.insert(name, stub);
        }
    }

    /// The stub exposed under `name`.
    pub fn get(&self, name: &str) -> Option<Stub> {
        self.lock().get(name).cloned()
    }

    /// Whether a stub is exposed under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Exposed names, sorted.
    pub fn names(&self) -> Vec<FunctionName> {
        let mut names: Vec<_> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Call the stub exposed under `name`.
    ///
    /// Fails immediately if nothing is exposed under `name`; otherwise returns
    /// the stub's pending call.
    pub fn call(
        &self,
        name: &str,
        args: Args,
    ) -> Result<impl Future<Output = CallResult> + Send + 'static + use<>, DispatchError> {
        let stub = self
            .get(name)
            .ok_or_else(|| DispatchError::NotExposed(name.into()))?;
        Ok(stub.call(args))
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &Self::NAME)
            .field("stubs", &self.names())
            .finish()
    }
}
