//! Diff command.

use std::path::Path;

use crate::diff::{change_summary, unified_diff};

/// Run diff command - pure preview of a candidate edit; touches nothing.
pub fn run_diff(root: &Path, path: &Path, candidate: &Path, context: usize) {
    let target = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let original = match std::fs::read_to_string(&target) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Cannot read '{}': {e}", target.display());
            std::process::exit(1);
        }
    };
    let updated = match std::fs::read_to_string(candidate) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Cannot read '{}': {e}", candidate.display());
            std::process::exit(1);
        }
    };

    let label = path.display().to_string();
    let diff = unified_diff(&original, &updated, &label, context);
    if diff.is_empty() {
        println!("No changes.");
        return;
    }

    print!("{diff}");

    let summary = change_summary(&original, &updated);
    println!();
    println!(
        "{} added, {} modified, {} deleted ({} change{})",
        summary.added_lines,
        summary.modified_lines,
        summary.deleted_lines,
        summary.total_changes,
        if summary.total_changes == 1 { "" } else { "s" }
    );
}
