//! Document elements and the injection target.

use crate::resource::ResourceKind;

/// Where an element is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// The document head.
    Head,
    /// The document body.
    Body,
}

/// An element appended to a document by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A script loaded from a source location.
    ExternalScript {
        /// Source location.
        src: String,
        /// Execution type.
        kind: ResourceKind,
        /// Stringified configuration payload.
        config: String,
    },
    /// A script carrying its code as the element body.
    InlineScript {
        /// Script body.
        code: String,
        /// Execution type.
        kind: ResourceKind,
        /// Stringified configuration payload.
        config: String,
    },
    /// The base runtime's module script.
    ModuleScript {
        /// Source location.
        src: String,
    },
    /// A stylesheet link.
    Stylesheet {
        /// Stylesheet location.
        href: String,
    },
}

impl Element {
    /// The placement the loader uses for this element.
    pub fn default_placement(&self) -> Placement {
        match self {
            Self::InlineScript { .. } => Placement::Body,
            _ => Placement::Head,
        }
    }
}

/// An injection target.
///
/// Appending an element must start loading or executing it; the loader
/// never waits for that to finish.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a pyscall Document",
    label = "missing `Document` implementation",
    note = "Documents must implement `append` to receive injected elements."
)]
pub trait Document: Send + Sync + 'static {
    /// Append an element.
    fn append(&self, placement: Placement, element: Element);
}

impl<D: Document + ?Sized> Document for std::sync::Arc<D> {
    fn append(&self, placement: Placement, element: Element) {
        (**self).append(placement, element)
    }
}

impl<D: Document + ?Sized> Document for Box<D> {
    fn append(&self, placement: Placement, element: Element) {
        (**self).append(placement, element)
    }
}
