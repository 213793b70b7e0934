//! Document backends.
//!
//! - [`MemoryDocument`]: records appended elements, optionally executing them
//! - [`HtmlDocument`]: renders appended elements as page markup

pub mod html;
pub mod memory;

pub use html::HtmlDocument;
pub use memory::MemoryDocument;
