//! The article store: the single entry point for reading and changing the
//! collection and its categories.
//!
//! Every mutation reads the whole collection from the tier chosen by the
//! [`BackendSelector`], changes it in memory and writes the whole collection
//! back. There is no concurrency token; the last write wins.

use chrono::NaiveDate;
use tracing::instrument;

use crate::{
    Article, ArticleFilter, ArticleId, ArticleUpdate, CategoryRegistry, Config, Error,
    NewArticle, Stats, Status,
    domain::{
        BackendChoice,
        article::{next_id, seed_collection},
        category::usage_count,
    },
    storage::{
        BackendError, BackendSelector, CacheMirror, Persistence, Probe, SeedStore, Served,
        codec,
    },
};

/// The outcome of a write, together with how far it was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written<T> {
    /// What the write produced.
    pub value: T,
    /// Whether the write reached the durable store.
    pub persistence: Persistence,
}

/// CRUD over the article collection.
///
/// Construct one per process with [`ArticleStore::open`] and share it.
#[derive(Debug)]
pub struct ArticleStore {
    backend: BackendSelector,
    categories: CategoryRegistry,
    cache: Option<CacheMirror>,
    high_water: ArticleId,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl ArticleStore {
    /// A store over explicitly supplied parts, without a cache mirror.
    #[must_use]
    pub const fn new(backend: BackendSelector, categories: CategoryRegistry) -> Self {
        Self {
            backend,
            categories,
            cache: None,
            high_water: 0,
            today: local_today,
        }
    }

    /// Opens the tiers named by `config`.
    ///
    /// When the seed tier is the configured backend and a cache mirror is
    /// configured, the mirror's collection replaces the built-in seed. Custom
    /// categories persisted in the durable store are restored.
    #[must_use]
    pub fn open(config: &Config) -> Self {
        let cache = config.cache_path.clone().map(CacheMirror::new);

        let seed = match (&cache, config.backend) {
            (Some(cache), BackendChoice::Seed) => {
                SeedStore::primed(cache.load_or(seed_collection))
            }
            _ => SeedStore::default(),
        };

        let backend = BackendSelector::from_config(config, seed);
        let categories = CategoryRegistry::new(config.default_categories.iter().cloned())
            .with_custom(backend.load_categories());

        tracing::debug!(
            "Opened article store (backend: {}, durable bound: {})",
            config.backend,
            backend.is_durable()
        );

        Self {
            cache,
            ..Self::new(backend, categories)
        }
    }

    /// Mirrors every write to `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheMirror) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Uses `today` to date new articles.
    #[must_use]
    pub const fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Whether writes currently reach the durable store.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        self.backend.is_durable()
    }

    /// The tier selector.
    #[must_use]
    pub const fn backend(&self) -> &BackendSelector {
        &self.backend
    }

    /// The whole collection and the tier that served it.
    #[must_use]
    pub fn served(&self) -> Served {
        self.backend.load()
    }

    /// Articles matching `filter`, in stored order (newest first).
    #[must_use]
    pub fn list(&self, filter: &ArticleFilter) -> Vec<Article> {
        self.served()
            .articles
            .into_iter()
            .filter(|article| filter.matches(article))
            .collect()
    }

    /// The article with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is none.
    pub fn get(&self, id: ArticleId) -> Result<Article, Error> {
        self.served()
            .articles
            .into_iter()
            .find(|article| article.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// The article with `id`, if it is published.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is none or it is a draft.
    pub fn get_published(&self, id: ArticleId) -> Result<Article, Error> {
        self.get(id)
            .ok()
            .filter(Article::is_published)
            .ok_or(Error::NotFound(id))
    }

    /// Published articles.
    #[must_use]
    pub fn published(&self) -> Vec<Article> {
        self.list(&ArticleFilter::default().status(Status::Published))
    }

    /// Published, featured articles.
    #[must_use]
    pub fn featured(&self) -> Vec<Article> {
        self.list(
            &ArticleFilter::default()
                .status(Status::Published)
                .featured(true),
        )
    }

    /// The first `limit` published articles.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<Article> {
        let mut articles = self.published();
        articles.truncate(limit);
        articles
    }

    /// Counts over the whole collection.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::of(&self.served().articles)
    }

    /// Adds an article, assigning its id and today's date, and puts it first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a required field is empty or the
    /// category is not registered. Nothing is written in that case.
    #[instrument(skip(self, fields), fields(title = %fields.title))]
    pub fn create(&mut self, fields: NewArticle) -> Result<Written<Article>, Error> {
        fields.validate()?;
        self.require_category(&fields.category)?;

        let mut articles = self.load_for_write();
        let id = next_id(&articles, self.high_water);
        self.high_water = id;

        let article = fields.into_article(id, (self.today)());
        articles.insert(0, article.clone());

        let persistence = self.persist(articles);
        tracing::info!("Created article {id}");
        Ok(Written {
            value: article,
            persistence,
        })
    }

    /// Merges `changes` into the article with `id`. The id and date are kept.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if a supplied required field is empty or the
    ///   supplied category is not registered.
    /// - [`Error::NotFound`] if there is no such article.
    #[instrument(skip(self, changes))]
    pub fn update(
        &mut self,
        id: ArticleId,
        changes: ArticleUpdate,
    ) -> Result<Written<Article>, Error> {
        changes.validate()?;
        if let Some(category) = &changes.category {
            self.require_category(category)?;
        }

        let mut articles = self.load_for_write();
        let article = articles
            .iter_mut()
            .find(|article| article.id == id)
            .ok_or(Error::NotFound(id))?;
        article.apply(changes);
        let article = article.clone();

        let persistence = self.persist(articles);
        tracing::info!("Updated article {id}");
        Ok(Written {
            value: article,
            persistence,
        })
    }

    /// Flips the article with `id` between draft and published.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such article.
    #[instrument(skip(self))]
    pub fn toggle_status(&mut self, id: ArticleId) -> Result<Written<Article>, Error> {
        let mut articles = self.load_for_write();
        let article = articles
            .iter_mut()
            .find(|article| article.id == id)
            .ok_or(Error::NotFound(id))?;
        article.status = article.status.toggled();
        let article = article.clone();

        let persistence = self.persist(articles);
        tracing::info!("Article {id} is now {}", article.status);
        Ok(Written {
            value: article,
            persistence,
        })
    }

    /// Removes the article with `id` and returns it. Its id is never reused.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such article.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: ArticleId) -> Result<Written<Article>, Error> {
        let mut articles = self.load_for_write();
        let position = articles
            .iter()
            .position(|article| article.id == id)
            .ok_or(Error::NotFound(id))?;
        let article = articles.remove(position);

        let persistence = self.persist(articles);
        tracing::info!("Deleted article {id}");
        Ok(Written {
            value: article,
            persistence,
        })
    }

    /// The category registry.
    #[must_use]
    pub const fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// Registers a custom category. Returns `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `name` is empty.
    #[instrument(skip(self))]
    pub fn add_category(&mut self, name: &str) -> Result<bool, Error> {
        let added = self.categories.add(name.to_string())?;
        if added {
            self.persist_categories();
            tracing::info!("Added category '{name}'");
        }
        Ok(added)
    }

    /// Removes a custom category. Returns `false` if it was not registered.
    ///
    /// # Errors
    ///
    /// - [`Error::ProtectedCategory`] if `name` is a default category.
    /// - [`Error::InUse`] if an article references it.
    #[instrument(skip(self))]
    pub fn remove_category(&mut self, name: &str) -> Result<bool, Error> {
        let articles = self.served().articles;
        let removed = self.categories.remove(name, &articles)?;
        if removed {
            self.persist_categories();
            tracing::info!("Removed category '{name}'");
        }
        Ok(removed)
    }

    /// Number of articles in category `name`.
    #[must_use]
    pub fn usage_count(&self, name: &str) -> usize {
        usage_count(&self.served().articles, name)
    }

    /// The collection as a portable JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the collection cannot be serialized.
    pub fn export(&self) -> Result<String, Error> {
        Ok(codec::export(&self.served().articles).map_err(BackendError::from)?)
    }

    /// Replaces the whole collection with the articles in `document`.
    ///
    /// Returns the number of imported articles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the document is malformed. The
    /// collection is left untouched in that case.
    #[instrument(skip(self, document))]
    pub fn import(&mut self, document: &str) -> Result<Written<usize>, Error> {
        let articles = codec::import(document)?;
        Ok(self.replace(articles))
    }

    /// Like [`import`](Self::import), for an already parsed document.
    ///
    /// # Errors
    ///
    /// See [`import`](Self::import).
    #[instrument(skip(self, document))]
    pub fn replace_all(&mut self, document: serde_json::Value) -> Result<Written<usize>, Error> {
        let articles = codec::from_value(document)?;
        Ok(self.replace(articles))
    }

    /// Copies the snapshot file's collection into the durable store.
    ///
    /// Returns the number of copied articles.
    ///
    /// # Errors
    ///
    /// - [`Error::BackendUnavailable`] if no durable store is bound or no
    ///   snapshot file is configured.
    /// - [`Error::Backend`] if the snapshot cannot be read or the durable
    ///   write fails.
    #[instrument(skip(self))]
    pub fn migrate_snapshot(&self) -> Result<usize, Error> {
        let durable = self
            .backend
            .durable()
            .ok_or(Error::BackendUnavailable("durable"))?;
        let snapshot = self
            .backend
            .snapshot()
            .ok_or(Error::BackendUnavailable("snapshot"))?;

        let articles = snapshot.load()?;
        durable.save(&articles)?;
        if let Some(cache) = &self.cache {
            cache.store(&articles);
        }

        tracing::info!(
            "Migrated {} articles from {} to {}",
            articles.len(),
            snapshot.path().display(),
            durable.path().display()
        );
        Ok(articles.len())
    }

    /// Reports tier availability without changing anything.
    #[must_use]
    pub fn probe(&self) -> Probe {
        self.backend.probe()
    }

    fn require_category(&self, name: &str) -> Result<(), Error> {
        if self.categories.contains(name) {
            Ok(())
        } else {
            Err(Error::Validation(format!("unknown category '{name}'")))
        }
    }

    /// Reads the collection for a mutation, raising the high-water mark to
    /// cover every id it holds.
    fn load_for_write(&mut self) -> Vec<Article> {
        let articles = self.served().articles;
        if let Some(max) = articles.iter().map(|article| article.id).max() {
            self.high_water = self.high_water.max(max);
        }
        articles
    }

    fn replace(&mut self, articles: Vec<Article>) -> Written<usize> {
        let count = articles.len();
        let persistence = self.persist(articles);
        tracing::info!("Replaced collection with {count} articles");
        Written {
            value: count,
            persistence,
        }
    }

    fn persist(&mut self, articles: Vec<Article>) -> Persistence {
        if let Some(cache) = &self.cache {
            cache.store(&articles);
        }
        self.backend.save(articles)
    }

    fn persist_categories(&self) {
        if let Persistence::Volatile { reason } =
            self.backend.save_categories(self.categories.custom())
        {
            tracing::debug!("Custom categories held in memory only: {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BackendKind, DurableStore, SnapshotFile};

    fn may_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn june() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn seed_store() -> ArticleStore {
        let backend = BackendSelector::new(BackendChoice::Seed, None, None, SeedStore::default());
        ArticleStore::new(backend, CategoryRegistry::default()).with_clock(may_day)
    }

    fn fields(title: &str, category: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            excerpt: format!("About {title}"),
            content: format!("<p>{title}</p>"),
            category: category.to_string(),
            author: "Editor".to_string(),
            ..NewArticle::default()
        }
    }

    fn ids(articles: &[Article]) -> Vec<ArticleId> {
        articles.iter().map(|a| a.id).collect()
    }

    #[test]
    fn create_assigns_next_id_and_todays_date() {
        let mut store = seed_store();

        let created = store.create(fields("Spring event", "Event")).unwrap();

        assert_eq!(created.value.id, 4);
        assert_eq!(created.value.date, may_day());
        assert_eq!(created.value.status, Status::Draft);
        assert_eq!(ids(&store.list(&ArticleFilter::default())), [4, 1, 2, 3]);
    }

    #[test]
    fn create_on_an_empty_collection_starts_at_one() {
        let mut store = seed_store();
        store.import("[]").unwrap();

        let created = store.create(fields("First", "Notice")).unwrap();

        assert_eq!(created.value.id, 1);
    }

    #[test]
    fn writes_without_durable_are_volatile_but_visible() {
        let mut store = seed_store();

        let created = store.create(fields("Volatile", "Notice")).unwrap();

        assert!(!created.persistence.is_durable());
        assert!(created.persistence.warning().is_some());
        assert_eq!(store.get(created.value.id).unwrap(), created.value);
    }

    #[test]
    fn create_rejects_empty_required_fields() {
        let mut store = seed_store();
        let mut blank = fields("x", "Notice");
        blank.content = String::new();

        assert!(matches!(store.create(blank), Err(Error::Validation(_))));
        assert_eq!(ids(&store.list(&ArticleFilter::default())), [1, 2, 3]);
    }

    #[test]
    fn create_rejects_unknown_categories() {
        let mut store = seed_store();
        let Err(Error::Validation(message)) = store.create(fields("x", "Gossip")) else {
            panic!("expected a validation error");
        };
        assert!(message.contains("Gossip"));
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let mut store = seed_store();

        store.delete(2).unwrap();
        let created = store.create(fields("After delete", "Notice")).unwrap();

        assert_eq!(created.value.id, 4);
        assert!(matches!(store.get(2), Err(Error::NotFound(2))));
    }

    #[test]
    fn deleting_the_newest_article_does_not_free_its_id() {
        let mut store = seed_store();
        let first = store.create(fields("Newest", "Notice")).unwrap().value;

        store.delete(first.id).unwrap();
        let second = store.create(fields("Next", "Notice")).unwrap().value;

        assert!(second.id > first.id);
    }

    #[test]
    fn update_merges_supplied_fields_only() {
        let mut store = seed_store();
        let before = store.get(2).unwrap();
        store = store.with_clock(june);

        let updated = store
            .update(
                2,
                ArticleUpdate {
                    title: Some("Moved".to_string()),
                    featured: Some(true),
                    ..ArticleUpdate::default()
                },
            )
            .unwrap()
            .value;

        assert_eq!(updated.title, "Moved");
        assert!(updated.featured);
        assert_eq!(updated.id, before.id);
        assert_eq!(updated.date, before.date);
        assert_eq!(updated.excerpt, before.excerpt);
        assert_eq!(updated.category, before.category);
        assert_eq!(store.get(2).unwrap(), updated);
    }

    #[test]
    fn update_of_a_missing_article_is_not_found() {
        let mut store = seed_store();
        assert!(matches!(
            store.update(42, ArticleUpdate::default()),
            Err(Error::NotFound(42))
        ));
    }

    #[test]
    fn update_rejects_unknown_category() {
        let mut store = seed_store();
        let changes = ArticleUpdate {
            category: Some("Gossip".to_string()),
            ..ArticleUpdate::default()
        };
        assert!(matches!(store.update(1, changes), Err(Error::Validation(_))));
        assert_eq!(store.get(1).unwrap().category, "Press Release");
    }

    #[test]
    fn toggle_flips_status() {
        let mut store = seed_store();

        let toggled = store.toggle_status(1).unwrap().value;
        assert_eq!(toggled.status, Status::Draft);
        assert!(matches!(store.get_published(1), Err(Error::NotFound(1))));
        assert!(store.featured().is_empty());

        store.toggle_status(1).unwrap();
        assert_eq!(store.get_published(1).unwrap().id, 1);
    }

    #[test]
    fn read_views() {
        let mut store = seed_store();
        store.create(fields("Draft", "Notice")).unwrap();

        assert_eq!(ids(&store.published()), [1, 2, 3]);
        assert_eq!(ids(&store.featured()), [1]);
        assert_eq!(ids(&store.recent(2)), [1, 2]);
        assert_eq!(
            ids(&store.list(&ArticleFilter::default().status(Status::Draft))),
            [4]
        );

        let stats = store.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.draft, 1);
        assert_eq!(stats.published, 3);
    }

    #[test]
    fn custom_category_guarded_by_usage() {
        let backend = BackendSelector::new(BackendChoice::Seed, None, None, SeedStore::default());
        let registry = CategoryRegistry::new(["Press".to_string(), "Notice".to_string()]);
        let mut store = ArticleStore::new(backend, registry).with_clock(may_day);
        assert!(store.add_category("Event").unwrap());
        let tagged = store.create(fields("Open day", "Event")).unwrap().value;

        assert!(matches!(
            store.remove_category("Event"),
            Err(Error::InUse { count: 1, .. })
        ));

        store.delete(tagged.id).unwrap();
        assert!(store.remove_category("Event").unwrap());
        assert!(!store.categories().contains("Event"));
    }

    #[test]
    fn defaults_are_never_removable() {
        let mut store = seed_store();
        assert_eq!(store.usage_count("Careers"), 0);
        assert!(matches!(
            store.remove_category("Careers"),
            Err(Error::ProtectedCategory(_))
        ));
    }

    #[test]
    fn adding_an_existing_category_is_a_no_op() {
        let mut store = seed_store();
        assert!(!store.add_category("Notice").unwrap());
        assert_eq!(store.categories().list().count(), 4);
    }

    #[test]
    fn export_then_import_is_identity() {
        let mut store = seed_store();
        let before = store.list(&ArticleFilter::default());

        let document = store.export().unwrap();
        let written = store.import(&document).unwrap();

        assert_eq!(written.value, before.len());
        assert_eq!(store.list(&ArticleFilter::default()), before);
    }

    #[test]
    fn import_of_a_non_array_leaves_the_collection_untouched() {
        let mut store = seed_store();
        let before = store.served();

        assert!(matches!(
            store.import(r#"{"articles": []}"#),
            Err(Error::Validation(_))
        ));
        assert_eq!(store.served(), before);
    }

    #[test]
    fn replace_all_accepts_parsed_documents() {
        let mut store = seed_store();
        let value = serde_json::to_value(&seed_collection()[..1]).unwrap();

        assert_eq!(store.replace_all(value).unwrap().value, 1);
        assert_eq!(ids(&store.list(&ArticleFilter::default())), [1]);
    }

    #[test]
    fn unreachable_durable_serves_the_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news.json");
        let mut snapshot = seed_collection();
        snapshot.truncate(2);
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let backend = BackendSelector::new(
            BackendChoice::Durable,
            None,
            Some(SnapshotFile::new(path)),
            SeedStore::default(),
        );
        let store = ArticleStore::new(backend, CategoryRegistry::default());

        assert_eq!(store.list(&ArticleFilter::default()), snapshot);
        assert_eq!(store.served().source, BackendKind::Snapshot);
    }

    #[test]
    fn durable_writes_and_categories_survive_reopening() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            backend: BackendChoice::Durable,
            ..Config::default()
        }
        .resolve(tmp.path());

        let mut store = ArticleStore::open(&config).with_clock(may_day);
        assert!(store.is_durable());
        store.add_category("Webinar").unwrap();
        let created = store.create(fields("Kept", "Webinar")).unwrap();
        assert!(created.persistence.is_durable());
        drop(store);

        let store = ArticleStore::open(&config);
        assert!(store.categories().contains("Webinar"));
        assert_eq!(store.get(created.value.id).unwrap(), created.value);
        assert_eq!(store.served().source, BackendKind::Durable);
    }

    #[test]
    fn migrate_needs_a_durable_store() {
        let store = seed_store();
        assert!(matches!(
            store.migrate_snapshot(),
            Err(Error::BackendUnavailable("durable"))
        ));
    }

    #[test]
    fn migrate_copies_the_snapshot_into_the_durable_store() {
        let tmp = tempfile::tempdir().unwrap();
        let snapshot_path = tmp.path().join("news.json");
        let mut snapshot = seed_collection();
        snapshot.truncate(1);
        std::fs::write(&snapshot_path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let durable = DurableStore::open(&tmp.path().join("news.redb")).unwrap();
        let backend = BackendSelector::new(
            BackendChoice::Durable,
            Some(durable),
            Some(SnapshotFile::new(snapshot_path)),
            SeedStore::default(),
        );
        let store = ArticleStore::new(backend, CategoryRegistry::default());

        assert_eq!(store.migrate_snapshot().unwrap(), 1);

        let served = store.served();
        assert_eq!(served.source, BackendKind::Durable);
        assert_eq!(served.articles, snapshot);
    }

    #[test]
    fn cache_mirror_primes_the_seed_tier() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            cache_path: Some(tmp.path().join("cache.json")),
            ..Config::default()
        }
        .resolve(tmp.path());

        let mut store = ArticleStore::open(&config).with_clock(may_day);
        let created = store.create(fields("Cached", "Notice")).unwrap().value;
        drop(store);

        let store = ArticleStore::open(&config);
        assert_eq!(store.get(created.id).unwrap(), created);
        assert_eq!(store.list(&ArticleFilter::default()).len(), 4);
    }

    #[test]
    fn cache_mirror_is_ignored_when_a_server_backend_is_configured() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheMirror::new(tmp.path().join("cache.json"));
        cache.store(&[]);
        let config = Config {
            backend: BackendChoice::Snapshot,
            cache_path: Some(cache.path().to_path_buf()),
            ..Config::default()
        }
        .resolve(tmp.path());

        let store = ArticleStore::open(&config);

        assert_eq!(store.list(&ArticleFilter::default()), seed_collection());
    }
}
