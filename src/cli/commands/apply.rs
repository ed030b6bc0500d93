//! Apply and Restore commands.
//!
//! Both rewrite a document on disk and then re-index it, keeping the file
//! and its record in step. The patch layer itself never talks to the index.

use std::path::{Path, PathBuf};

use crate::diff::patch;
use crate::indexing::WorkspaceIndexer;

/// Run apply command - overwrite a document with candidate content, backup
/// first, then re-index.
pub async fn run_apply(
    indexer: &WorkspaceIndexer,
    path: &Path,
    candidate: &Path,
    no_backup: bool,
) {
    let target = resolve(indexer.root(), path);

    let content = match std::fs::read_to_string(candidate) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Cannot read '{}': {e}", candidate.display());
            std::process::exit(1);
        }
    };

    match patch::apply(&target, &content, !no_backup) {
        Ok(outcome) => {
            if let Some(backup) = &outcome.backup_path {
                println!("Backed up previous content to: {}", backup.display());
            }
            println!("Applied changes to: {}", target.display());
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    reindex(indexer, &target).await;
}

/// Run restore command - swap the .bak backup over the document, then
/// re-index.
pub async fn run_restore(indexer: &WorkspaceIndexer, path: &Path) {
    let target = resolve(indexer.root(), path);

    match patch::restore(&target) {
        Ok(()) => println!("Restored: {}", target.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    reindex(indexer, &target).await;
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

async fn reindex(indexer: &WorkspaceIndexer, target: &Path) {
    match indexer.upsert(target).await {
        Ok(document) => println!("Re-indexed as {} ({})", document.id, document.entity_type),
        Err(e) => {
            // The file is already rewritten at this point.
            eprintln!("Warning: file updated but re-indexing failed: {e}");
            std::process::exit(1);
        }
    }
}
