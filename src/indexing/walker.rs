//! File system walker for discovering workspace documents.
//!
//! Directory traversal honors .gitignore rules, the workspace's own
//! `.worklensignore` file, and the configured ignore patterns. Only
//! markdown documents come back; everything else in the workspace is
//! invisible to the index.

use crate::config::{IGNORE_FILE, Settings};
use crate::documents::is_document_path;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Walks the workspace to find documents to index.
pub struct DocumentWalker {
    settings: Arc<Settings>,
}

impl DocumentWalker {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Walk `root` and yield every indexable document path.
    pub fn walk(&self, root: &Path) -> impl Iterator<Item = PathBuf> + use<> {
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(false)
            .git_ignore(true) // Respect .gitignore files
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .max_depth(None)
            .require_git(false); // Gitignore rules apply outside git repos too

        builder.add_custom_ignore_filename(IGNORE_FILE);

        // Configured patterns are exclusions, hence the "!" prefix.
        let mut override_builder = ignore::overrides::OverrideBuilder::new(root);
        for pattern in &self.settings.indexing.ignore_patterns {
            if let Err(e) = override_builder.add(&format!("!{pattern}")) {
                eprintln!("Warning: Invalid ignore pattern '{pattern}': {e}");
            }
        }
        if let Ok(overrides) = override_builder.build() {
            builder.overrides(overrides);
        }

        builder
            .build()
            .filter_map(Result::ok) // Skip files we can't access
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(|entry| {
                let path = entry.path();

                // Skip dotfiles
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if name.starts_with('.') {
                        return None;
                    }
                }

                is_document_path(path).then(|| path.to_path_buf())
            })
    }

}
