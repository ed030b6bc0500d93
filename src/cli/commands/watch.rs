//! Watch command.

use std::sync::Arc;

use crate::config::Settings;
use crate::indexing::WorkspaceIndexer;
use crate::watcher::WorkspaceWatcher;

/// Run watch command - bring the index current, then mirror filesystem
/// changes until interrupted.
pub async fn run_watch(indexer: Arc<WorkspaceIndexer>, settings: &Settings) {
    let stats = indexer.index_workspace().await;
    if stats.failed == 0 {
        println!("Indexed {} documents. Watching for changes...", stats.indexed);
    } else {
        println!(
            "Indexed {} documents ({} failed, see log). Watching for changes...",
            stats.indexed, stats.failed
        );
    }

    let watcher = match WorkspaceWatcher::new(indexer, settings.watch.debounce_ms) {
        Ok(watcher) => watcher,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = watcher.watch().await {
        eprintln!("Watcher stopped: {e}");
        std::process::exit(1);
    }
}
