//! Transaction support for all-or-nothing disk writes
//!
//! Materialization and packaging must never leave half a bundle behind.
//! A [`Transaction`] records every file and directory it is told about and
//! removes them again unless it is committed.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new();
//! fs::create_dir(&workspace)?;
//! transaction.track_dir_created(&workspace);
//!
//! // Perform operations...
//! transaction.track_file_created(path);
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

/// A transaction over files and directories created on disk
#[derive(Debug, Default)]
pub struct Transaction {
    /// Files created during this transaction
    created_files: HashSet<PathBuf>,

    /// Directories created during this transaction
    created_dirs: HashSet<PathBuf>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a file that was (or is about to be) created
    ///
    /// Track before writing so a failed partial write is still removed.
    pub fn track_file_created(&mut self, path: impl Into<PathBuf>) {
        self.created_files.insert(path.into());
    }

    /// Track a directory that was created during this transaction
    pub fn track_dir_created(&mut self, path: impl Into<PathBuf>) {
        self.created_dirs.insert(path.into());
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Remove everything this transaction created
    pub fn rollback(&mut self) {
        if self.committed {
            return;
        }

        for path in &self.created_files {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!(path = %path.display(), "Failed to remove file during rollback: {e}");
                }
            }
        }

        // Deepest first so nested directories empty out before their parents
        let mut dirs: Vec<_> = self.created_dirs.iter().collect();
        dirs.sort_by_key(|b| std::cmp::Reverse(b.components().count()));
        for path in dirs {
            if path.is_dir() {
                if let Err(e) = fs::remove_dir_all(path) {
                    warn!(path = %path.display(), "Failed to remove directory during rollback: {e}");
                }
            }
        }

        self.created_files.clear();
        self.created_dirs.clear();
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

#[cfg(test)]
mod tests;
