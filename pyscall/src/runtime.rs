//! The dispatcher handle shared by every collaborator.

use crate::namespace::{IntoFunctionNames, Namespace};
use pyscall_core::{
    Args, CallResult, Callback, ConfigPayload, Document, FunctionName, LoadError, ResourceKind,
};
use pyscall_std::{
    loader::{Injection, ResourceLoader},
    registry::DeferredRegistry,
};
use std::{future::Future, sync::Arc};

struct Inner {
    registry: Arc<DeferredRegistry>,
    loader: ResourceLoader,
    namespace: Namespace,
}

/// The single dispatcher of a page session.
///
/// A `Runtime` is only created by [`Bootstrap`]; clones are handles to the
/// same registry, loader and namespace. Nothing is torn down before the last
/// handle is dropped.
///
/// [`Bootstrap`]: crate::Bootstrap
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<Inner>,
}

impl Runtime {
    pub(crate) fn new(document: Arc<dyn Document>) -> Self {
        let registry = Arc::new(DeferredRegistry::new());
        Self {
            inner: Arc::new(Inner {
                namespace: Namespace::new(registry.clone()),
                loader: ResourceLoader::new(document),
                registry,
            }),
        }
    }

    /// The deferred registry loaded code registers callbacks with.
    pub fn registry(&self) -> &Arc<DeferredRegistry> {
        &self.inner.registry
    }

    /// The resource loader.
    pub fn loader(&self) -> &ResourceLoader {
        &self.inner.loader
    }

    /// The namespace of exposed stubs.
    pub fn namespace(&self) -> &Namespace {
        &self.inner.namespace
    }

    /// See [`DeferredRegistry::set_callback`].
    pub fn set_callback<C: Callback>(&self, name: impl Into<FunctionName>, callback: C) {
        self.inner.registry.set_callback(name, callback);
    }

    /// See [`DeferredRegistry::has_callback`].
    pub fn has_callback(&self, name: &str) -> bool {
        self.inner.registry.has_callback(name)
    }

    /// See [`DeferredRegistry::call`].
    pub fn call<N>(
        &self,
        name: N,
        args: Args,
    ) -> impl Future<Output = CallResult> + Send + 'static + use<N>
    where
        N: Into<FunctionName>,
    {
        self.inner.registry.call(name, args)
    }

    /// See [`ResourceLoader::add_script`].
    pub fn add_script<K>(
        &self,
        src: impl Into<String>,
        config: impl Into<ConfigPayload>,
        kind: K,
    ) -> Result<Injection, LoadError>
    where
        K: TryInto<ResourceKind>,
        LoadError: From<K::Error>,
    {
        self.inner.loader.add_script(src, config, kind)
    }

    /// See [`ResourceLoader::add_script_code`].
    pub fn add_script_code<K>(
        &self,
        code: impl Into<String>,
        id: impl Into<String>,
        config: impl Into<ConfigPayload>,
        kind: K,
    ) -> Result<Injection, LoadError>
    where
        K: TryInto<ResourceKind>,
        LoadError: From<K::Error>,
    {
        self.inner.loader.add_script_code(code, id, config, kind)
    }

    /// See [`Namespace::register_function`].
    pub fn register_function(&self, names: impl IntoFunctionNames) {
        self.inner.namespace.register_function(names);
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("registry", &self.inner.registry)
            .field("loader", &self.inner.loader)
            .field("namespace", &self.inner.namespace)
            .finish()
    }
}
