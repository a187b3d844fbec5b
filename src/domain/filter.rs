//! List filters over the collection.

use regex::Regex;
use serde::Deserialize;

use crate::{Article, Status};

/// Free-text search over an article's title and excerpt.
#[derive(Debug, Clone)]
pub enum Search {
    /// Case-insensitive substring match.
    Contains(String),
    /// Regular expression match.
    Regex(Regex),
}

impl Search {
    fn matches(&self, article: &Article) -> bool {
        match self {
            Self::Contains(needle) => {
                let needle = needle.to_lowercase();
                article.title.to_lowercase().contains(&needle)
                    || article.excerpt.to_lowercase().contains(&needle)
            }
            Self::Regex(re) => re.is_match(&article.title) || re.is_match(&article.excerpt),
        }
    }
}

/// A predicate over articles. Every criterion that is set must match.
///
/// The default filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Only articles in this state.
    pub status: Option<Status>,
    /// Only articles in this category (exact match).
    pub category: Option<String>,
    /// Only articles whose title or excerpt matches.
    pub search: Option<Search>,
    /// Only featured articles.
    pub featured: Option<bool>,
}

impl ArticleFilter {
    /// Restrict to `status`.
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to `category`.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to a case-insensitive substring of title or excerpt.
    ///
    /// An empty needle matches everything.
    #[must_use]
    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(Search::Contains(needle.into()));
        self
    }

    /// Restrict to featured (or non-featured) articles.
    #[must_use]
    pub const fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    /// Whether `article` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        self.status.is_none_or(|s| article.status == s)
            && self
                .category
                .as_deref()
                .is_none_or(|c| article.category == c)
            && self.featured.is_none_or(|f| article.featured == f)
            && self.search.as_ref().is_none_or(|s| s.matches(article))
    }
}

/// Query-string form of [`ArticleFilter`], as accepted by the HTTP API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// `draft` or `published`.
    pub status: Option<Status>,
    /// Exact category name.
    pub category: Option<String>,
    /// Case-insensitive substring of title or excerpt.
    pub q: Option<String>,
    /// Featured flag.
    pub featured: Option<bool>,
}

impl From<FilterParams> for ArticleFilter {
    fn from(params: FilterParams) -> Self {
        Self {
            status: params.status,
            category: params.category.filter(|c| !c.is_empty()),
            search: params
                .q
                .filter(|q| !q.is_empty())
                .map(Search::Contains),
            featured: params.featured,
        }
    }
}
