//! # Resource Loader
//!
//! Injects external scripts and inline code into a [`Document`], at most once
//! per [`ResourceIdentity`].
//!
//! Injection is fire-and-forget: the loader appends the element and returns.
//! Whatever the element executes is expected to call back into the registry
//! on its own schedule.

use pyscall_core::{
    ConfigPayload, Document, Element, LoadError, Placement, ResourceIdentity, ResourceKind,
};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

/// Outcome of an injection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    /// The element was appended.
    Injected,
    /// The identity was already injected; nothing happened.
    AlreadyPresent,
}

impl Injection {
    /// Whether the request appended an element.
    pub fn is_injected(self) -> bool {
        matches!(self, Self::Injected)
    }
}

#[derive(Default)]
struct Injected {
    seen: HashSet<ResourceIdentity>,
    order: Vec<ResourceIdentity>,
}

/// Idempotent resource injector bound to one document.
pub struct ResourceLoader {
    document: Arc<dyn Document>,
    injected: Mutex<Injected>,
}

impl ResourceLoader {
    /// Create a loader appending to `document`.
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            injected: Mutex::new(Injected::default()),
        }
    }

    /// The document this loader appends to.
    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    /// Inject an external script loaded from `src`.
    ///
    /// A `src` that was already injected is skipped before `kind` is looked
    /// at. Otherwise an invalid kind fails before the document is touched.
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
        let src = src.into();
        let identity = ResourceIdentity::Url(src.clone());
        self.inject(identity, config.into(), kind, |kind, config| {
            Element::ExternalScript { src, kind, config }
        })
    }

    /// Inject inline `code` under the opaque identifier `id`.
    ///
    /// Only the first body injected for an identifier is ever appended.
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
        let code = code.into();
        let identity = ResourceIdentity::Tag(id.into());
        self.inject(identity, config.into(), kind, |kind, config| {
            Element::InlineScript { code, kind, config }
        })
    }

    /// Inject a module script, such as the base runtime.
    pub fn add_module(&self, src: impl Into<String>) -> Injection {
        let src = src.into();
        self.inject_unchecked(ResourceIdentity::Url(src.clone()), Element::ModuleScript { src })
    }

    /// Inject a stylesheet link.
    pub fn add_stylesheet(&self, href: impl Into<String>) -> Injection {
        let href = href.into();
        self.inject_unchecked(
            ResourceIdentity::Url(href.clone()),
            Element::Stylesheet { href },
        )
    }

    /// Whether `identity` has been injected.
    pub fn is_injected(&self, identity: &ResourceIdentity) -> bool {
        self.lock().seen.contains(identity)
    }

    /// Injected identities in injection order.
    pub fn injected(&self) -> Vec<ResourceIdentity> {
        self.lock().order.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Injected> {
        self.injected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn inject<K>(
        &self,
        identity: ResourceIdentity,
        config: ConfigPayload,
        kind: K,
        element: impl FnOnce(ResourceKind, String) -> Element,
    ) -> Result<Injection, LoadError>
    where
        K: TryInto<ResourceKind>,
        LoadError: From<K::Error>,
    {
        let mut injected = self.lock();
        if injected.seen.contains(&identity) {
            #[cfg(feature = "tracing")]
            tracing::debug!(identity = %identity, "resource already injected, skipping");
            return Ok(Injection::AlreadyPresent);
        }

        let kind = match kind.try_into() {
            Ok(kind) => kind,
            Err(err) => {
                let err = LoadError::from(err);
                #[cfg(feature = "tracing")]
                tracing::warn!(identity = %identity, error = %err, "rejecting resource");
                return Err(err);
            }
        };
        let config = config.to_attribute()?;

        injected.seen.insert(identity.clone());
        injected.order.push(identity.clone());
        drop(injected);

        let element = element(kind, config);
        let placement = element.default_placement();
        #[cfg(feature = "tracing")]
        tracing::info!(identity = %identity, kind = %kind, ?placement, "injecting resource");
        self.document.append(placement, element);
        Ok(Injection::Injected)
    }

    fn inject_unchecked(&self, identity: ResourceIdentity, element: Element) -> Injection {
        {
            let mut injected = self.lock();
            if !injected.seen.insert(identity.clone()) {
                return Injection::AlreadyPresent;
            }
            injected.order.push(identity.clone());
        }
        #[cfg(feature = "tracing")]
        tracing::info!(identity = %identity, "injecting runtime resource");
        self.document.append(Placement::Head, element);
        Injection::Injected
    }
}

impl std::fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("injected", &self.injected())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use serde_json::json;

    fn loader() -> (ResourceLoader, MemoryDocument) {
        let document = MemoryDocument::new();
        (ResourceLoader::new(Arc::new(document.clone())), document)
    }

    #[test]
    fn test_add_script_once_per_src() {
        let (loader, document) = loader();

        let first = loader.add_script("/assets/cb.py", json!({}), "mpy").unwrap();
        let second = loader.add_script("/assets/cb.py", json!({}), "mpy").unwrap();

        assert_eq!(first, Injection::Injected);
        assert_eq!(second, Injection::AlreadyPresent);
        assert_eq!(document.len(), 1);
        assert_eq!(
            document.head(),
            vec![Element::ExternalScript {
                src: "/assets/cb.py".to_string(),
                kind: ResourceKind::Mpy,
                config: "{}".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_kind_fails_before_mutation() {
        let (loader, document) = loader();

        let err = loader.add_script("/a.py", "{}", "javascript").unwrap_err();
        assert!(matches!(err, LoadError::InvalidKind { .. }));
        assert!(document.is_empty());
        assert!(!loader.is_injected(&ResourceIdentity::url("/a.py")));

        // A later valid request for the same src still goes through.
        assert!(loader.add_script("/a.py", "{}", "py").unwrap().is_injected());
    }

    #[test]
    fn test_inline_code_first_body_wins() {
        let (loader, document) = loader();

        loader
            .add_script_code("print(1)", "c1", "{}", ResourceKind::Py)
            .unwrap();
        let second = loader
            .add_script_code("print(2)", "c1", "{}", ResourceKind::Py)
            .unwrap();

        assert_eq!(second, Injection::AlreadyPresent);
        assert_eq!(
            document.body(),
            vec![Element::InlineScript {
                code: "print(1)".to_string(),
                kind: ResourceKind::Py,
                config: "{}".to_string(),
            }]
        );
        assert!(document.head().is_empty());
    }

    #[test]
    fn test_url_and_tag_identities_are_distinct() {
        let (loader, document) = loader();
        loader.add_script("x", "{}", "mpy").unwrap();
        loader.add_script_code("pass", "x", "{}", "mpy").unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(
            loader.injected(),
            vec![ResourceIdentity::url("x"), ResourceIdentity::tag("x")]
        );
    }

    #[test]
    fn test_runtime_resources_are_idempotent() {
        let (loader, document) = loader();
        assert!(loader.add_module("https://cdn/core.js").is_injected());
        assert!(!loader.add_module("https://cdn/core.js").is_injected());
        assert!(loader.add_stylesheet("https://cdn/core.css").is_injected());
        assert_eq!(document.head().len(), 2);
    }
}
