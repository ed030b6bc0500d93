//! Seam for an optional search collaborator.

use anyhow::Result;

/// Receives document content changes from the indexer.
///
/// Implementations get the full raw content of every indexed document and
/// are told when a document leaves the index. Errors are logged by the
/// indexer and never fail the triggering mutation: the record store is the
/// source of truth and stays consistent even when a collaborator misbehaves.
pub trait SearchIndex: Send + Sync {
    /// A document was indexed or re-indexed under `id`.
    fn index(&self, id: &str, content: &str) -> Result<()>;

    /// The document previously indexed under `id` was removed.
    fn remove(&self, id: &str) -> Result<()>;
}
