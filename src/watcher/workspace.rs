//! Workspace watcher that keeps the index in sync with the filesystem.
//!
//! Bridges notify's callback thread into the async world over a bounded
//! channel, debounces create/modify bursts, and applies deletions
//! immediately. Every reaction funnels through the indexer, so watch-driven
//! updates obey the same serialization as manual ones.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

use crate::documents::is_document_path;
use crate::indexing::WorkspaceIndexer;
use crate::{debug_event, log_event};

use super::debouncer::Debouncer;
use super::error::WatchError;

/// How often debounced changes are checked for readiness.
const TICK_MS: u64 = 100;

/// Size of the notify-to-async event bridge. A full queue backpressures the
/// notify thread; events are only lost once the receiving loop is gone.
const EVENT_QUEUE_SIZE: usize = 100;

pub struct WorkspaceWatcher {
    indexer: Arc<WorkspaceIndexer>,
    debouncer: Debouncer,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    watcher: notify::RecommendedWatcher,
    root: PathBuf,
}

impl WorkspaceWatcher {
    /// Create a watcher over the indexer's workspace root.
    pub fn new(indexer: Arc<WorkspaceIndexer>, debounce_ms: u64) -> Result<Self, WatchError> {
        let root = indexer.root().to_path_buf();
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_SIZE);

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Fires on notify's own thread.
            if tx.blocking_send(res).is_err() {
                tracing::debug!("[watcher] event dropped, receiver gone");
            }
        })?;

        Ok(Self {
            indexer,
            debouncer: Debouncer::new(debounce_ms),
            event_rx: rx,
            watcher,
            root,
        })
    }

    /// Watch the workspace until the process ends.
    ///
    /// Creations and modifications re-index the file once it has been quiet
    /// for the debounce window; deletions drop the record immediately.
    pub async fn watch(mut self) -> Result<(), WatchError> {
        self.watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::PathWatchFailed {
                path: self.root.clone(),
                reason: e.to_string(),
            })?;

        log_event!("watcher", "started", "{}", self.root.display());

        loop {
            let timeout = sleep(Duration::from_millis(TICK_MS));
            tokio::pin!(timeout);

            tokio::select! {
                maybe_event = self.event_rx.recv() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await,
                        Some(Err(e)) => {
                            tracing::error!("[watcher] file watch error: {e}");
                        }
                        None => return Err(WatchError::ChannelClosed),
                    }
                }

                _ = &mut timeout => {
                    for path in self.debouncer.take_ready() {
                        self.process_change(&path).await;
                    }
                }
            }
        }
    }

    async fn handle_event(&mut self, event: Event) {
        for path in event.paths {
            if !is_document_path(&path) {
                continue;
            }

            match event.kind {
                EventKind::Create(_) | EventKind::Modify(_) => {
                    self.debouncer.record(path);
                }
                EventKind::Remove(_) => {
                    self.debouncer.remove(&path);
                    self.process_removal(&path).await;
                }
                _ => {}
            }
        }
    }

    /// Re-index a path whose quiet window elapsed. The file may already be
    /// gone again (rename-as-modify, delete inside the window); that reads
    /// as a removal.
    async fn process_change(&self, path: &Path) {
        if !path.exists() {
            self.process_removal(path).await;
            return;
        }

        log_event!("watcher", "modified", "{}", path.display());
        if let Err(e) = self.indexer.upsert(path).await {
            tracing::error!("[watcher] reindex failed for {}: {e}", path.display());
        }
    }

    async fn process_removal(&self, path: &Path) {
        match self.indexer.remove(path).await {
            Ok(Some(id)) => log_event!("watcher", "removed", "{id}"),
            Ok(None) => debug_event!("watcher", "was not in index", "{}", path.display()),
            Err(e) => {
                tracing::error!("[watcher] removal failed for {}: {e}", path.display());
            }
        }
    }
}
