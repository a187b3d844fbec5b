//! The durable tier: a redb database holding the whole collection under a
//! single key.

use std::path::{Path, PathBuf};

use redb::{Database, ReadableDatabase, TableDefinition};

use crate::{Article, storage::BackendError};

const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

const NEWS_KEY: &str = "news";
const CATEGORIES_KEY: &str = "categories";

/// A persistent key-value store holding the canonical collection.
///
/// Each value is a JSON document; writes replace the whole document.
pub struct DurableStore {
    path: PathBuf,
    db: Database,
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl DurableStore {
    /// Opens the database at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or is locked by another process.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(redb::Error::from)?;
        tracing::debug!("Opened durable store at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            db,
        })
    }

    /// The database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored collection. `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Fails on storage errors or if the stored document does not parse.
    pub fn load(&self) -> Result<Option<Vec<Article>>, BackendError> {
        self.get(NEWS_KEY)
    }

    /// Replaces the stored collection.
    ///
    /// # Errors
    ///
    /// Fails if the write transaction cannot be committed.
    pub fn save(&self, articles: &[Article]) -> Result<(), BackendError> {
        self.put(NEWS_KEY, &articles)
    }

    /// Reads the stored custom categories. `None` if never written.
    ///
    /// # Errors
    ///
    /// Fails on storage errors or if the stored document does not parse.
    pub fn load_categories(&self) -> Result<Option<Vec<String>>, BackendError> {
        self.get(CATEGORIES_KEY)
    }

    /// Replaces the stored custom categories.
    ///
    /// # Errors
    ///
    /// Fails if the write transaction cannot be committed.
    pub fn save_categories(&self, categories: &[String]) -> Result<(), BackendError> {
        self.put(CATEGORIES_KEY, &categories)
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BackendError> {
        let txn = self.db.begin_read().map_err(redb::Error::from)?;
        let table = match txn.open_table(DOCUMENTS) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(redb::Error::from(e).into()),
        };
        let Some(value) = table.get(key).map_err(redb::Error::from)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(value.value())?))
    }

    fn put<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), BackendError> {
        let bytes = serde_json::to_vec(value)?;
        let txn = self.db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = txn.open_table(DOCUMENTS).map_err(redb::Error::from)?;
            table
                .insert(key, bytes.as_slice())
                .map_err(redb::Error::from)?;
        }
        txn.commit().map_err(redb::Error::from)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, bytes: &[u8]) {
        let txn = self.db.begin_write().unwrap();
        {
            let mut table = txn.open_table(DOCUMENTS).unwrap();
            table.insert(NEWS_KEY, bytes).unwrap();
        }
        txn.commit().unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::seed_collection;

    #[test]
    fn fresh_store_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DurableStore::open(&tmp.path().join("news.redb")).unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(store.load_categories().unwrap().is_none());
    }

    #[test]
    fn save_replaces_the_whole_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DurableStore::open(&tmp.path().join("news.redb")).unwrap();
        let mut articles = seed_collection();

        store.save(&articles).unwrap();
        articles.truncate(1);
        store.save(&articles).unwrap();

        assert_eq!(store.load().unwrap(), Some(articles));
    }

    #[test]
    fn data_survives_reopening() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/news.redb");
        {
            let store = DurableStore::open(&path).unwrap();
            store.save(&seed_collection()).unwrap();
            store.save_categories(&["Event".to_string()]).unwrap();
        }

        let store = DurableStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), Some(seed_collection()));
        assert_eq!(
            store.load_categories().unwrap(),
            Some(vec!["Event".to_string()])
        );
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DurableStore::open(&tmp.path().join("news.redb")).unwrap();
        store.put_raw(b"not json");

        assert!(matches!(store.load(), Err(BackendError::Json(_))));
    }
}
