//! Workspace document model.
//!
//! This module provides:
//! - Entity classification from a document's path under the workspace root
//! - Attribute-block (`---` delimited) parsing with opaque passthrough of
//!   unrecognized keys
//! - The [`Document`] record the index stores and the summary rows listings
//!   return

pub mod parse;
pub mod types;

pub use parse::{ATTRIBUTE_MARKER, ParseError, ParsedSource, compose_document, parse_source};
pub use types::{Document, DocumentSummary, EntityType};

/// File extension of managed documents. The bulk pass and the watcher only
/// touch files carrying it.
pub const DOC_EXTENSION: &str = "md";

/// Whether a path names a managed document file.
pub fn is_document_path(path: &std::path::Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(DOC_EXTENSION)
}
