//! The snapshot tier: a static JSON file produced at deploy time.

use std::path::{Path, PathBuf};

use crate::{Article, storage::BackendError};

/// A read-only collection document on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// A snapshot at `path`. The file is not touched until read.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file currently exists.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.path.is_file()
    }

    /// Reads and parses the snapshot.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, unreadable or not an article array.
    pub fn load(&self) -> Result<Vec<Article>, BackendError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
