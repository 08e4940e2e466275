//! Packaging for SAMMI Next extensions.
//!
//! Turns a bundled script plus optional `external` and `over` fragments into a
//! `.sef` container, and renders a preview page for trying the extension in a
//! browser.

pub mod document;
pub mod error;
pub mod hook;
pub mod preview;
pub mod serializer;

pub use document::{PackageDocument, SectionKind};
pub use error::{PackageError, Result};
pub use hook::{CommandHookDetector, NamespaceDefaultDetector};
pub use preview::{render_preview, write_preview};
pub use serializer::{PackageSerializer, PackageSources};
