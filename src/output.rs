//! Transactional output writer
//!
//! Derived artifacts are first written to temporary files next to their
//! destinations. Nothing gets its final name until every artifact has been
//! written completely, so a failed run never leaves a half-written output
//! behind a valid name.

use std::io::Write;
use std::path::{Path, PathBuf};

use drillkit_core::{OutputError, Result};
use tempfile::NamedTempFile;
use tracing::debug;

/// An artifact written to a temporary file, waiting for commit
struct StagedFile {
    temp: NamedTempFile,
    destination: PathBuf,
}

/// Set of outputs committed together
#[derive(Default)]
pub struct OutputTransaction {
    staged: Vec<StagedFile>,
}

impl OutputTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `contents` to a temporary file in the destination's directory
    pub fn stage(&mut self, destination: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
        let destination = destination.as_ref().to_path_buf();
        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(contents)?;
        temp.as_file().sync_all()?;
        debug!(
            "Staged {} bytes for {} at {}",
            contents.len(),
            destination.display(),
            temp.path().display()
        );

        self.staged.push(StagedFile { temp, destination });
        Ok(())
    }

    /// Number of staged outputs
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Move every staged file to its destination, replacing existing files
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut committed = Vec::with_capacity(self.staged.len());
        for StagedFile { temp, destination } in self.staged {
            temp.persist(&destination)
                .map_err(|e| OutputError::CommitFailed {
                    path: destination.clone(),
                    reason: e.error.to_string(),
                })?;
            committed.push(destination);
        }
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_nothing_visible_before_commit() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");

        let mut tx = OutputTransaction::new();
        tx.stage(&a, b"first").unwrap();
        tx.stage(&b, b"second").unwrap();
        assert_eq!(tx.len(), 2);
        assert!(!a.exists());
        assert!(!b.exists());

        let committed = tx.commit().unwrap();
        assert_eq!(committed, vec![a.clone(), b.clone()]);
        assert_eq!(std::fs::read(&a).unwrap(), b"first");
        assert_eq!(std::fs::read(&b).unwrap(), b"second");
    }

    #[test]
    fn test_dropped_transaction_leaves_no_files() {
        let dir = tempdir().unwrap();
        {
            let mut tx = OutputTransaction::new();
            tx.stage(dir.path().join("a.txt"), b"data").unwrap();
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_commit_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.NC");
        std::fs::write(&path, b"old").unwrap();

        let mut tx = OutputTransaction::new();
        tx.stage(&path, b"new").unwrap();
        tx.commit().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_stage_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let mut tx = OutputTransaction::new();
        assert!(tx
            .stage(dir.path().join("missing").join("a.txt"), b"x")
            .is_err());
    }
}
