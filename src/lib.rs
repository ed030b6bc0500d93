//! A structured index over a markdown work-management workspace.
//!
//! Documents are classified by their directory, indexed under stable ids,
//! and kept current by a filesystem watcher. The diff and patch layers
//! preview and commit edits without ever touching the index themselves.

pub mod cli;
pub mod config;
pub mod diff;
pub mod documents;
pub mod indexing;
pub mod logging;
pub mod storage;
pub mod watcher;

pub use config::Settings;
pub use documents::{Document, DocumentSummary, EntityType};
pub use indexing::{IndexError, IndexStats, SearchIndex, WorkspaceIndexer};
pub use storage::{RecordStore, StorageError};
pub use watcher::WorkspaceWatcher;
