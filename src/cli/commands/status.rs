//! Status command.

use std::collections::BTreeMap;

use crate::config::Settings;
use crate::indexing::WorkspaceIndexer;

/// Run status command - where the workspace lives and what the index holds.
pub fn run_status(indexer: &WorkspaceIndexer, settings: &Settings) {
    println!("Workspace root: {}", settings.documents_root().display());
    println!("Index path:     {}", settings.index_dir().display());

    let summaries = match indexer.list(None) {
        Ok(summaries) => summaries,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Documents:      {}", summaries.len());
    if summaries.is_empty() {
        return;
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for summary in &summaries {
        *counts.entry(summary.entity_type.as_str()).or_default() += 1;
    }
    for (tag, count) in counts {
        println!("  {tag:<10} {count}");
    }
}
