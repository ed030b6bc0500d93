//! Index command.

use std::path::PathBuf;
use std::time::Instant;

use crate::indexing::{IndexStats, WorkspaceIndexer};

/// Run index command - bulk pass over the workspace, a subtree, or one file.
pub async fn run_index(indexer: &WorkspaceIndexer, path: Option<PathBuf>) {
    let started = Instant::now();

    let Some(path) = path else {
        let stats = indexer.index_workspace().await;
        report(&stats, started);
        return;
    };

    let resolved = if path.is_absolute() {
        path
    } else {
        indexer.root().join(path)
    };

    if resolved.is_dir() {
        let stats = indexer.index_directory(&resolved).await;
        report(&stats, started);
        return;
    }

    match indexer.upsert(&resolved).await {
        Ok(document) => {
            println!(
                "Indexed {} as {} ({})",
                resolved.display(),
                document.id,
                document.entity_type
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn report(stats: &IndexStats, started: Instant) {
    if stats.indexed == 0 && stats.failed == 0 {
        println!("No documents found to index.");
        return;
    }

    let elapsed = started.elapsed().as_secs_f64();
    if stats.failed == 0 {
        println!("Indexed {} documents in {elapsed:.2}s", stats.indexed);
    } else {
        println!(
            "Indexed {} documents in {elapsed:.2}s ({} failed, see log)",
            stats.indexed, stats.failed
        );
    }
}
