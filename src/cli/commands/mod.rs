//! CLI command implementations.

pub mod apply;
pub mod diff;
pub mod index;
pub mod init;
pub mod records;
pub mod status;
pub mod watch;

pub use apply::{run_apply, run_restore};
pub use diff::run_diff;
pub use index::run_index;
pub use init::{run_config, run_init};
pub use records::{run_get, run_list};
pub use status::run_status;
pub use watch::run_watch;
