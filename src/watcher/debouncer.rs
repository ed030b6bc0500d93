//! Per-path debouncing of change events.
//!
//! Editors save in bursts (auto-save, format-on-save, atomic replace), so a
//! changed file is re-indexed only after it has gone quiet for the
//! configured window.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Tracks when each path last changed and releases paths that have been
/// quiet long enough.
#[derive(Debug)]
pub struct Debouncer {
    pending: HashMap<PathBuf, Instant>,
    window: Duration,
}

impl Debouncer {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            pending: HashMap::new(),
            window: Duration::from_millis(debounce_ms),
        }
    }

    /// Record a change, restarting the quiet window for this path.
    pub fn record(&mut self, path: PathBuf) {
        self.pending.insert(path, Instant::now());
    }

    /// Forget a pending path, e.g. when the file was deleted before its
    /// window elapsed.
    pub fn remove(&mut self, path: &Path) {
        self.pending.remove(path);
    }

    /// Drain every path whose quiet window has elapsed.
    pub fn take_ready(&mut self) -> Vec<PathBuf> {
        let now = Instant::now();
        let mut ready = Vec::new();

        self.pending.retain(|path, last_change| {
            if now.duration_since(*last_change) >= self.window {
                ready.push(path.clone());
                false
            } else {
                true
            }
        });

        ready
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_path_released_after_quiet_window() {
        let mut debouncer = Debouncer::new(50);
        let path = PathBuf::from("/ws/projects/alpha.md");

        debouncer.record(path.clone());
        assert!(debouncer.take_ready().is_empty());
        assert!(debouncer.has_pending());

        sleep(Duration::from_millis(80));

        assert_eq!(debouncer.take_ready(), vec![path]);
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_new_change_restarts_the_window() {
        let mut debouncer = Debouncer::new(50);
        let path = PathBuf::from("/ws/notes.md");

        debouncer.record(path.clone());
        sleep(Duration::from_millis(25));
        debouncer.record(path.clone());

        // 25ms into the restarted window: still quiet time to serve.
        sleep(Duration::from_millis(10));
        assert!(debouncer.take_ready().is_empty());

        sleep(Duration::from_millis(70));
        assert_eq!(debouncer.take_ready(), vec![path]);
    }

    #[test]
    fn test_paths_release_independently() {
        let mut debouncer = Debouncer::new(50);
        let first = PathBuf::from("/ws/a.md");
        let second = PathBuf::from("/ws/b.md");

        debouncer.record(first.clone());
        debouncer.record(second.clone());
        sleep(Duration::from_millis(80));

        let mut ready = debouncer.take_ready();
        ready.sort();
        assert_eq!(ready, vec![first, second]);
    }

    #[test]
    fn test_removed_path_never_releases() {
        let mut debouncer = Debouncer::new(50);
        let path = PathBuf::from("/ws/gone.md");

        debouncer.record(path.clone());
        debouncer.remove(&path);

        sleep(Duration::from_millis(80));
        assert!(debouncer.take_ready().is_empty());
    }
}
