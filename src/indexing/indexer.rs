//! Workspace document indexer.
//!
//! Central mutation path for the index: read a document off disk, derive
//! its record, replace whatever the store held for that path, and notify
//! the optional search collaborator. All mutations are serialized behind
//! one async lock; reads go straight to the store's current snapshot and
//! never wait on a writer.

use crate::config::Settings;
use crate::documents::{Document, DocumentSummary, EntityType, compose_document};
use crate::indexing::error::{IndexError, IndexResult};
use crate::indexing::search::SearchIndex;
use crate::indexing::walker::DocumentWalker;
use crate::storage::RecordStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Counts from a bulk indexing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub indexed: usize,
    pub failed: usize,
}

pub struct WorkspaceIndexer {
    settings: Arc<Settings>,
    root: PathBuf,
    store: RecordStore,
    search: Option<Arc<dyn SearchIndex>>,
    write_lock: Mutex<()>,
}

impl WorkspaceIndexer {
    /// Open the indexer for the workspace described by `settings`.
    pub fn new(settings: Arc<Settings>) -> IndexResult<Self> {
        let root = settings.documents_root();
        let store = RecordStore::open(settings.index_dir())?;
        Ok(Self {
            settings,
            root,
            store,
            search: None,
            write_lock: Mutex::new(()),
        })
    }

    /// Attach a search collaborator that mirrors index mutations.
    pub fn with_search(mut self, search: Arc<dyn SearchIndex>) -> Self {
        self.search = Some(search);
        self
    }

    /// Root directory documents live under and are classified against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Index or re-index the document at `path`.
    ///
    /// Relative paths are taken as workspace-relative. The file is read and
    /// parsed under the write lock, so a record always reflects one coherent
    /// read of the file. Returns the stored document.
    pub async fn upsert(&self, path: &Path) -> IndexResult<Document> {
        let path = self.workspace_path(path);
        let _guard = self.write_lock.lock().await;

        let content = std::fs::read_to_string(&path).map_err(|source| IndexError::Read {
            path: path.clone(),
            source,
        })?;
        let mut document =
            compose_document(&path, &self.root, content).map_err(|source| IndexError::Parse {
                path: path.clone(),
                source,
            })?;

        // First-index time survives re-indexing; only updated_at moves.
        if let Some(previous) = self.store.get_by_path(&path)? {
            document.indexed_at = previous.indexed_at;
        }

        self.store.upsert(&document)?;
        debug!(target: "indexing", "Indexed: {} ({})", path.display(), document.entity_type);

        if let Some(search) = &self.search {
            if let Err(e) = search.index(&document.id, &document.content) {
                warn!(
                    target: "indexing",
                    "Search index update failed for '{}': {e}", document.id
                );
            }
        }

        Ok(document)
    }

    /// Drop the record for `path` from the index.
    ///
    /// Returns the removed document's id, or `None` when the path was not
    /// indexed (removing twice is harmless).
    pub async fn remove(&self, path: &Path) -> IndexResult<Option<String>> {
        let path = self.workspace_path(path);
        let _guard = self.write_lock.lock().await;

        let Some(id) = self.store.remove(&path)? else {
            return Ok(None);
        };
        info!(target: "indexing", "Removed from index: {}", path.display());

        if let Some(search) = &self.search {
            if let Err(e) = search.remove(&id) {
                warn!(target: "indexing", "Search index removal failed for '{id}': {e}");
            }
        }

        Ok(Some(id))
    }

    /// Index every document in the workspace.
    pub async fn index_workspace(&self) -> IndexStats {
        let root = self.root.clone();
        self.index_directory(&root).await
    }

    /// Index every document under `dir`.
    ///
    /// Unreadable or unparseable documents are logged and skipped; one bad
    /// file never stops the pass.
    pub async fn index_directory(&self, dir: &Path) -> IndexStats {
        let dir = self.workspace_path(dir);
        let walker = DocumentWalker::new(self.settings.clone());
        let paths: Vec<PathBuf> = walker.walk(&dir).collect();
        info!(
            target: "indexing",
            "Found {} documents under {}", paths.len(), dir.display()
        );

        let mut stats = IndexStats::default();
        for path in paths {
            match self.upsert(&path).await {
                Ok(_) => stats.indexed += 1,
                Err(e) => {
                    warn!(target: "indexing", "Skipping '{}': {e}", path.display());
                    stats.failed += 1;
                }
            }
        }
        stats
    }

    /// Look up a document by id.
    pub fn get(&self, id: &str) -> IndexResult<Option<Document>> {
        Ok(self.store.get_by_id(id)?)
    }

    /// Look up a document by its path.
    pub fn get_by_path(&self, path: &Path) -> IndexResult<Option<Document>> {
        Ok(self.store.get_by_path(&self.workspace_path(path))?)
    }

    /// Summaries of indexed documents, optionally filtered by type, ordered
    /// by id.
    pub fn list(&self, entity_type: Option<EntityType>) -> IndexResult<Vec<DocumentSummary>> {
        Ok(self.store.list(entity_type)?)
    }

    /// Number of indexed documents.
    pub fn count(&self) -> IndexResult<usize> {
        Ok(self.store.count()?)
    }

    fn workspace_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
