//! In-memory document that records appended elements.

use pyscall_core::{Document, Element, Placement};
use std::sync::{Arc, Mutex, PoisonError};

type Executor = Arc<dyn Fn(&Element) + Send + Sync>;

/// A document that records every appended element.
///
/// Clones share the same record. An optional executor is invoked for each
/// appended element, standing in for the page running injected code.
///
/// # Example
///
/// ```rust,ignore
/// let document = MemoryDocument::new();
/// let loader = ResourceLoader::new(Arc::new(document.clone()));
///
/// loader.add_script("/assets/cb.py", "{}", "mpy")?;
/// assert_eq!(document.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemoryDocument {
    elements: Arc<Mutex<Vec<(Placement, Element)>>>,
    executor: Option<Executor>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document that runs `executor` on every appended element.
    pub fn with_executor(executor: impl Fn(&Element) + Send + Sync + 'static) -> Self {
        Self {
            elements: Arc::default(),
            executor: Some(Arc::new(executor)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Placement, Element)>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All appended elements with their placement, in append order.
    pub fn elements(&self) -> Vec<(Placement, Element)> {
        self.lock().clone()
    }

    /// Elements appended to the head.
    pub fn head(&self) -> Vec<Element> {
        self.placed(Placement::Head)
    }

    /// Elements appended to the body.
    pub fn body(&self) -> Vec<Element> {
        self.placed(Placement::Body)
    }

    fn placed(&self, placement: Placement) -> Vec<Element> {
        self.lock()
            .iter()
            .filter(|(p, _)| *p == placement)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Number of appended elements.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Document for MemoryDocument {
    fn append(&self, placement: Placement, element: Element) {
        self.lock().push((placement, element.clone()));
        if let Some(executor) = &self.executor {
            executor(&element);
        }
    }
}

impl std::fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("elements", &self.lock())
            .finish_non_exhaustive()
    }
}
