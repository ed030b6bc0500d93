//! Document indexing.
//!
//! [`WorkspaceIndexer`] owns the read-parse-store pipeline and is the only
//! way records enter or leave the index. [`DocumentWalker`] discovers
//! documents for bulk passes, and [`SearchIndex`] is the seam for an
//! optional search collaborator that mirrors every mutation.

pub mod error;
pub mod indexer;
pub mod search;
pub mod walker;

pub use error::{IndexError, IndexResult};
pub use indexer::{IndexStats, WorkspaceIndexer};
pub use search::SearchIndex;
pub use walker::DocumentWalker;
