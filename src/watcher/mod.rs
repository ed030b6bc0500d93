//! Filesystem watching.
//!
//! [`WorkspaceWatcher`] mirrors filesystem changes into the index:
//! create/modify events re-index after a debounce window, deletions drop
//! records immediately. Best-effort: a missed or reordered event is
//! corrected by the next change or a bulk re-index.

pub mod debouncer;
pub mod error;
pub mod workspace;

pub use debouncer::Debouncer;
pub use error::WatchError;
pub use workspace::WorkspaceWatcher;
