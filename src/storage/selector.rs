//! Tier precedence for reads and writes.
//!
//! The configured [`BackendChoice`] decides which tiers exist; every call then
//! walks them in order:
//!
//! 1. the durable store, when one is bound
//! 2. the seed tier, once a volatile write has made it dirty
//! 3. the snapshot file, when configured and readable
//! 4. the seed tier
//!
//! A failing tier is logged and skipped, so reads always produce a
//! collection.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    Article,
    domain::{BackendChoice, Config},
    storage::{DurableStore, SeedStore, SnapshotFile},
};

/// The tier that served a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The redb database.
    Durable,
    /// The static snapshot file.
    Snapshot,
    /// The in-process seed collection.
    Seed,
}

impl BackendKind {
    /// Name used in diagnostics and the `X-Data-Source` header.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Snapshot => "snapshot",
            Self::Seed => "seed",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collection together with the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    /// The collection, in stored order.
    pub articles: Vec<Article>,
    /// Where it was read from.
    pub source: BackendKind,
}

/// How far a write got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// Committed to the durable store.
    Durable,
    /// Held in process memory only.
    Volatile {
        /// Why the durable store was not used.
        reason: String,
    },
}

impl Persistence {
    /// Whether the write will survive a restart.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        matches!(self, Self::Durable)
    }

    /// A user-facing warning for volatile writes.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Durable => None,
            Self::Volatile { reason } => Some(format!(
                "{reason}; changes are kept in memory and will be lost when the process exits"
            )),
        }
    }

    /// The tier that received the write.
    #[must_use]
    pub const fn storage(&self) -> BackendKind {
        match self {
            Self::Durable => BackendKind::Durable,
            Self::Volatile { .. } => BackendKind::Seed,
        }
    }
}

/// Result of a test read against the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurableTest {
    /// Whether the read succeeded.
    pub success: bool,
    /// Whether a collection is stored.
    pub has_data: bool,
    /// Number of stored articles.
    pub item_count: usize,
    /// The failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A read-only report of tier availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    /// When the probe ran.
    pub timestamp: DateTime<Utc>,
    /// The configured preference.
    pub backend: BackendChoice,
    /// Whether a durable store is bound.
    pub durable_available: bool,
    /// Whether the snapshot file is configured and present.
    pub snapshot_reachable: bool,
    /// The tier a read would be served from right now.
    pub serving: BackendKind,
    /// Test read of the durable store, when bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durable_test: Option<DurableTest>,
}

/// Chooses the tier for each read and write.
#[derive(Debug)]
pub struct BackendSelector {
    choice: BackendChoice,
    durable: Option<DurableStore>,
    snapshot: Option<SnapshotFile>,
    seed: SeedStore,
}

impl BackendSelector {
    /// A selector over explicitly supplied tiers.
    #[must_use]
    pub const fn new(
        choice: BackendChoice,
        durable: Option<DurableStore>,
        snapshot: Option<SnapshotFile>,
        seed: SeedStore,
    ) -> Self {
        Self {
            choice,
            durable,
            snapshot,
            seed,
        }
    }

    /// Binds the tiers named by `config`.
    ///
    /// A durable store that cannot be opened is logged and left unbound;
    /// reads then degrade to the snapshot file.
    #[must_use]
    pub fn from_config(config: &Config, seed: SeedStore) -> Self {
        let durable = match config.backend {
            BackendChoice::Durable => match DurableStore::open(&config.durable_path) {
                Ok(store) => Some(store),
                Err(e) => {
                    tracing::warn!(
                        "Durable store at {} is unavailable: {e}",
                        config.durable_path.display()
                    );
                    None
                }
            },
            BackendChoice::Snapshot | BackendChoice::Seed => None,
        };

        let snapshot = match config.backend {
            BackendChoice::Durable | BackendChoice::Snapshot => {
                Some(SnapshotFile::new(config.snapshot_path.clone()))
            }
            BackendChoice::Seed => None,
        };

        Self::new(config.backend, durable, snapshot, seed)
    }

    /// The configured preference.
    #[must_use]
    pub const fn choice(&self) -> BackendChoice {
        self.choice
    }

    /// The durable store, if bound.
    #[must_use]
    pub const fn durable(&self) -> Option<&DurableStore> {
        self.durable.as_ref()
    }

    /// The snapshot file, if configured.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&SnapshotFile> {
        self.snapshot.as_ref()
    }

    /// Whether writes currently go to the durable store.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        self.durable.is_some()
    }

    /// Reads the collection from the highest tier that answers.
    ///
    /// A collection held in memory after a volatile write is newer than any
    /// other tier and is served first.
    #[must_use]
    pub fn load(&self) -> Served {
        if self.seed.is_dirty() {
            return self.served_seed();
        }

        if let Some(durable) = &self.durable {
            match durable.load() {
                Ok(Some(articles)) => {
                    tracing::debug!("Loaded {} articles from durable store", articles.len());
                    return Served {
                        articles,
                        source: BackendKind::Durable,
                    };
                }
                Ok(None) => {
                    tracing::debug!("Durable store holds no collection, serving seed");
                    return self.served_seed();
                }
                Err(e) => tracing::warn!("Durable read failed, falling back: {e}"),
            }
        }

        if let Some(snapshot) = &self.snapshot {
            match snapshot.load() {
                Ok(articles) => {
                    tracing::debug!(
                        "Loaded {} articles from {}",
                        articles.len(),
                        snapshot.path().display()
                    );
                    return Served {
                        articles,
                        source: BackendKind::Snapshot,
                    };
                }
                Err(e) => tracing::debug!(
                    "Snapshot {} unavailable, serving seed: {e}",
                    snapshot.path().display()
                ),
            }
        }

        self.served_seed()
    }

    /// Writes the whole collection to the highest writable tier.
    ///
    /// Falls back to process memory when no durable store is bound or the
    /// durable write fails.
    pub fn save(&mut self, articles: Vec<Article>) -> Persistence {
        let reason = match &self.durable {
            Some(durable) => match durable.save(&articles) {
                Ok(()) => {
                    tracing::info!("Saved {} articles to durable store", articles.len());
                    self.seed.settle();
                    return Persistence::Durable;
                }
                Err(e) => {
                    tracing::error!("Durable write failed: {e}");
                    format!("durable write failed: {e}")
                }
            },
            None => "durable store is not configured".to_string(),
        };

        self.hold_in_memory(articles, reason)
    }

    fn hold_in_memory(&mut self, articles: Vec<Article>, reason: String) -> Persistence {
        tracing::warn!("{reason}; {} articles held in memory only", articles.len());
        self.seed.save(articles);
        Persistence::Volatile { reason }
    }

    /// Reads persisted custom categories. Empty when nothing is stored or the
    /// durable store is unavailable.
    #[must_use]
    pub fn load_categories(&self) -> Vec<String> {
        let Some(durable) = &self.durable else {
            return Vec::new();
        };
        durable
            .load_categories()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to read categories from durable store: {e}");
                None
            })
            .unwrap_or_default()
    }

    /// Persists custom categories to the durable store, if bound.
    pub fn save_categories(&self, categories: &[String]) -> Persistence {
        let Some(durable) = &self.durable else {
            return Persistence::Volatile {
                reason: "durable store is not configured".to_string(),
            };
        };
        match durable.save_categories(categories) {
            Ok(()) => Persistence::Durable,
            Err(e) => {
                tracing::error!("Failed to save categories: {e}");
                Persistence::Volatile {
                    reason: format!("durable write failed: {e}"),
                }
            }
        }
    }

    /// Reports which tiers are reachable without changing anything.
    #[must_use]
    pub fn probe(&self) -> Probe {
        let durable_test = self.durable.as_ref().map(|durable| match durable.load() {
            Ok(articles) => DurableTest {
                success: true,
                has_data: articles.is_some(),
                item_count: articles.map_or(0, |a| a.len()),
                error: None,
            },
            Err(e) => DurableTest {
                success: false,
                has_data: false,
                item_count: 0,
                error: Some(e.to_string()),
            },
        });

        Probe {
            timestamp: Utc::now(),
            backend: self.choice,
            durable_available: self.durable.is_some(),
            snapshot_reachable: self.snapshot.as_ref().is_some_and(SnapshotFile::is_reachable),
            serving: self.load().source,
            durable_test,
        }
    }

    fn served_seed(&self) -> Served {
        Served {
            articles: self.seed.articles().to_vec(),
            source: BackendKind::Seed,
        }
    }
}
