//! # Bootstrap
//!
//! Turns a [`RuntimeManifest`] into a live [`Runtime`].
//!
//! Once the document is ready the bootstrap, in order:
//!
//! 1. injects the pinned base runtime (module script and stylesheet)
//! 2. injects every declared resource, in declaration order
//! 3. exposes a stub for every declared function name
//!
//! Nothing waits for injected resources to load. Every resource kind is
//! checked before the first injection, so a manifest with an invalid kind
//! fails with the document untouched.

use crate::{
    manifest::{ResourceEntry, RuntimeManifest},
    runtime::Runtime,
};
use pyscall_core::{Document, PyscallError};
use std::{future::Future, sync::Arc};

/// One-shot page bootstrap.
pub struct Bootstrap {
    manifest: RuntimeManifest,
    document: Arc<dyn Document>,
}

impl Bootstrap {
    /// Prepare a bootstrap of `manifest` into `document`.
    pub fn new(manifest: RuntimeManifest, document: impl Document) -> Self {
        Self::with_shared(manifest, Arc::new(document))
    }

    /// Prepare a bootstrap into an already shared document.
    pub fn with_shared(manifest: RuntimeManifest, document: Arc<dyn Document>) -> Self {
        Self { manifest, document }
    }

    /// The manifest to execute.
    pub fn manifest(&self) -> &RuntimeManifest {
        &self.manifest
    }

    /// Wait for `ready`, then [`run`](Self::run).
    pub async fn on_ready<R>(self, ready: R) -> Result<Runtime, PyscallError>
    where
        R: Future<Output = ()>,
    {
        ready.await;
        self.run()
    }

    /// Run the bootstrap against a document that is already ready.
    pub fn run(self) -> Result<Runtime, PyscallError> {
        let Self { manifest, document } = self;
        #[cfg(feature = "tracing")]
        tracing::info!(
            version = %manifest.runtime.version,
            resources = manifest.resources.len(),
            functions = manifest.functions.len(),
            "bootstrapping runtime"
        );

        manifest.validate()?;

        let runtime = Runtime::new(document);
        let loader = runtime.loader();

        loader.add_module(manifest.runtime.script_url());
        loader.add_stylesheet(manifest.runtime.stylesheet_url());

        for entry in manifest.resources {
            match entry {
                ResourceEntry::Script { src, config, kind } => {
                    loader.add_script(src, config, kind.as_str())?;
                }
                ResourceEntry::Code {
                    code,
                    id,
                    config,
                    kind,
                } => {
                    loader.add_script_code(code, id, config, kind.as_str())?;
                }
            }
        }

        for name in manifest.functions {
            runtime.register_function(name);
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            injected = runtime.loader().injected().len(),
            exposed = runtime.namespace().names().len(),
            "runtime ready"
        );
        Ok(runtime)
    }
}

impl std::fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrap")
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscall_core::{Element, LoadError, ResourceKind};
    use pyscall_std::document::MemoryDocument;

    #[test]
    fn test_base_runtime_first() {
        let document = MemoryDocument::new();
        let manifest = RuntimeManifest::builder()
            .script("/assets/callback.py", "{}", "mpy")
            .build()
            .unwrap();
        Bootstrap::new(manifest, document.clone()).run().unwrap();

        assert_eq!(
            document.head(),
            vec![
                Element::ModuleScript {
                    src: "https://pyscript.net/releases/2025.5.1/core.js".to_string()
                },
                Element::Stylesheet {
                    href: "https://pyscript.net/releases/2025.5.1/core.css".to_string()
                },
                Element::ExternalScript {
                    src: "/assets/callback.py".to_string(),
                    kind: ResourceKind::Mpy,
                    config: "{}".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_invalid_kind_aborts() {
        let document = MemoryDocument::new();
        let manifest = RuntimeManifest::builder()
            .script("/ok.py", "{}", "py")
            .script("/bad.py", "{}", "js")
            .function("f")
            .build()
            .unwrap();
        let err = Bootstrap::new(manifest, document.clone()).run().unwrap_err();

        assert!(matches!(
            err,
            PyscallError::Load(LoadError::InvalidKind { ref kind, .. }) if kind == "js"
        ));
        assert!(document.is_empty());
    }

    #[tokio::test]
    async fn test_on_ready_defers_until_ready() {
        let document = MemoryDocument::new();
        let (ready_tx, ready_rx) = futures::channel::oneshot::channel::<()>();
        let bootstrap = Bootstrap::new(RuntimeManifest::default(), document.clone());

        let handle = tokio::spawn(bootstrap.on_ready(async move {
            let _ = ready_rx.await;
        }));
        tokio::task::yield_now().await;
        assert!(document.is_empty());

        ready_tx.send(()).unwrap();
        let runtime = handle.await.unwrap().unwrap();
        assert_eq!(runtime.loader().injected().len(), 2);
    }
}
