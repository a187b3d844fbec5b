//! A local, best-effort copy of the collection.
//!
//! The mirror never takes part in conflict resolution. It only seeds the
//! in-process tier when no server-side backend is configured.

use std::path::{Path, PathBuf};

use crate::Article;

/// A JSON file shadowing the collection on the local machine.
#[derive(Debug, Clone)]
pub struct CacheMirror {
    path: PathBuf,
}

impl CacheMirror {
    /// A mirror at `path`. Nothing is read or written yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The mirror file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached collection, if present and parseable.
    #[must_use]
    pub fn load(&self) -> Option<Vec<Article>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("No cached collection at {}: {e}", self.path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(articles) => Some(articles),
            Err(e) => {
                tracing::debug!(
                    "Ignoring unparseable cache at {}: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    /// The cached collection, or `fallback` when there is none.
    #[must_use]
    pub fn load_or(&self, fallback: impl FnOnce() -> Vec<Article>) -> Vec<Article> {
        self.load().unwrap_or_else(fallback)
    }

    /// Writes `articles` to the mirror. Failures are logged and ignored.
    pub fn store(&self, articles: &[Article]) {
        if let Err(e) = self.try_store(articles) {
            tracing::debug!(
                "Failed to update cache mirror at {}: {e}",
                self.path.display()
            );
        }
    }

    fn try_store(&self, articles: &[Article]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_vec(articles)?;
        std::fs::write(&self.path, content)
    }
}
