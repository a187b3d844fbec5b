use serde::Serialize;

use crate::{Article, Status};

/// Aggregate counts over the collection.
///
/// `monthly_views`, `active_pages` and `contacts` are derived from the
/// published count for the dashboard. They are not measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// All articles.
    pub total: usize,
    /// Published articles.
    pub published: usize,
    /// Draft articles.
    pub draft: usize,
    /// Published and featured articles.
    pub featured: usize,
    /// Derived: 1250 per published article.
    pub monthly_views: usize,
    /// Derived: published articles plus five, capped at fifteen.
    pub active_pages: usize,
    /// Derived: two and a half per published article, rounded down.
    pub contacts: usize,
}

impl Stats {
    /// Computes the stats of `articles`.
    #[must_use]
    pub fn of(articles: &[Article]) -> Self {
        let published = articles.iter().filter(|a| a.is_published()).count();
        let draft = articles
            .iter()
            .filter(|a| a.status == Status::Draft)
            .count();
        let featured = articles
            .iter()
            .filter(|a| a.is_published() && a.featured)
            .count();

        Self {
            total: articles.len(),
            published,
            draft,
            featured,
            monthly_views: published * 1250,
            active_pages: (published + 5).min(15),
            contacts: published * 5 / 2,
        }
    }
}
