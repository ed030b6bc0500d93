//! Backup-then-overwrite patch application.
//!
//! Writes never consult or update the index. A caller that patches an
//! indexed document must follow up by re-indexing the path, the same way an
//! external edit would be picked up.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Failed to back up '{path}' before writing: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No backup found for '{path}'")]
    MissingBackup { path: PathBuf },

    #[error("Failed to restore '{path}' from backup: {source}")]
    Restore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Where the prior content was moved, when a backup was taken.
    pub backup_path: Option<PathBuf>,
}

/// Backup location for `path`: the same name with `.bak` appended, so
/// `notes.md` backs up to `notes.md.bak`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Replace the content of `path`, first renaming the current file to its
/// backup location when `backup` is set.
///
/// The rename happens before the write and silently overwrites any earlier
/// backup, so only the most recent pre-patch content stays recoverable. If
/// the rename fails the original file is untouched and nothing is written.
/// The rename and the write are sequenced, not atomic as a pair. A missing
/// target file is created, with no backup to take.
pub fn apply(path: &Path, content: &str, backup: bool) -> Result<PatchOutcome, PatchError> {
    let mut saved = None;
    if backup && path.exists() {
        let backup = backup_path(path);
        std::fs::rename(path, &backup).map_err(|source| PatchError::Backup {
            path: path.to_path_buf(),
            source,
        })?;
        info!(target: "patch", "Created backup: {}", backup.display());
        saved = Some(backup);
    }

    std::fs::write(path, content).map_err(|source| PatchError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(target: "patch", "Applied patch to: {}", path.display());

    Ok(PatchOutcome { backup_path: saved })
}

/// Move the backup of `path` back over the file, discarding its current
/// content. Fails with [`PatchError::MissingBackup`] when no backup exists.
pub fn restore(path: &Path) -> Result<(), PatchError> {
    let backup = backup_path(path);
    if !backup.exists() {
        return Err(PatchError::MissingBackup {
            path: path.to_path_buf(),
        });
    }

    std::fs::rename(&backup, path).map_err(|source| PatchError::Restore {
        path: path.to_path_buf(),
        source,
    })?;
    info!(target: "patch", "Restored backup: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/tmp/notes.md")),
            PathBuf::from("/tmp/notes.md.bak")
        );
        assert_eq!(
            backup_path(Path::new("extensionless")),
            PathBuf::from("extensionless.bak")
        );
    }

    #[test]
    fn test_apply_backs_up_existing_content() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "old content").unwrap();

        let outcome = apply(&file, "new content", true).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new content");
        let backup = outcome.backup_path.expect("backup should be recorded");
        assert_eq!(backup, backup_path(&file));
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "old content");
    }

    #[test]
    fn test_apply_creates_missing_file_without_backup() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("fresh.md");

        let outcome = apply(&file, "content", true).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "content");
        assert_eq!(outcome.backup_path, None);
        assert!(!backup_path(&file).exists());
    }

    #[test]
    fn test_apply_without_backup_flag_overwrites_in_place() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "old").unwrap();

        let outcome = apply(&file, "new", false).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");
        assert_eq!(outcome.backup_path, None);
        assert!(!backup_path(&file).exists());
    }

    #[test]
    fn test_second_apply_overwrites_prior_backup() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "first").unwrap();

        apply(&file, "second", true).unwrap();
        apply(&file, "third", true).unwrap();

        // Only the most recent pre-patch content survives.
        assert_eq!(
            std::fs::read_to_string(backup_path(&file)).unwrap(),
            "second"
        );
    }

    #[test]
    fn test_restore_swaps_backup_back() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "original").unwrap();

        apply(&file, "patched", true).unwrap();
        restore(&file).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "original");
        assert!(!backup_path(&file).exists());
    }

    #[test]
    fn test_restore_without_backup_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "content").unwrap();

        let err = restore(&file).unwrap_err();
        assert!(matches!(err, PatchError::MissingBackup { .. }));
        // The file itself is untouched.
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "content");
    }
}
