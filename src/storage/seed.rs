//! The seed tier: the collection held in process memory.

use crate::{Article, domain::article::seed_collection};

/// The last-resort tier.
///
/// Starts from the built-in seed collection (or from a primed collection,
/// see [`SeedStore::primed`]) and accepts writes that live only as long as
/// the process. Once written, it is `dirty` and shadows the snapshot file.
#[derive(Debug, Clone)]
pub struct SeedStore {
    articles: Vec<Article>,
    dirty: bool,
}

impl Default for SeedStore {
    fn default() -> Self {
        Self::primed(seed_collection())
    }
}

impl SeedStore {
    /// A seed tier starting from `articles` instead of the built-in seed.
    #[must_use]
    pub const fn primed(articles: Vec<Article>) -> Self {
        Self {
            articles,
            dirty: false,
        }
    }

    /// The current in-memory collection.
    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Whether a write has replaced the initial collection.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces the in-memory collection.
    pub fn save(&mut self, articles: Vec<Article>) {
        self.articles = articles;
        self.dirty = true;
    }

    /// Stops shadowing the tiers above once they hold the latest collection.
    pub const fn settle(&mut self) {
        self.dirty = false;
    }
}
