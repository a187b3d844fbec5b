//! Articles, their creation and update payloads, and the seed collection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Identifier of an [`Article`].
///
/// Assigned by the store as one more than the largest id it has seen, so ids
/// are never recycled after a deletion.
pub type ArticleId = u64;

/// Publication state of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Visible only to editors.
    #[default]
    Draft,
    /// Visible on the public site.
    Published,
}

impl Status {
    /// The other state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Draft => Self::Published,
            Self::Published => Self::Draft,
        }
    }

    /// The wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news item.
///
/// The serialized shape of a `Vec<Article>` is the document format used by
/// every backend, by export and by import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Unique, never recycled.
    pub id: ArticleId,
    /// Headline.
    pub title: String,
    /// Short summary shown in listings.
    pub excerpt: String,
    /// Body. May hold HTML or markdown depending on the editor.
    pub content: String,
    /// Creation date. Not touched by updates.
    pub date: NaiveDate,
    /// Category name, expected to be registered in the
    /// [`CategoryRegistry`](crate::CategoryRegistry).
    pub category: String,
    /// Free-text byline.
    pub author: String,
    /// Whether the article is highlighted on the home page.
    #[serde(default)]
    pub featured: bool,
    /// Publication state.
    #[serde(default)]
    pub status: Status,
    /// External path or inline data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Article {
    /// Whether the article is visible on the public site.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }

    pub(crate) fn apply(&mut self, update: ArticleUpdate) {
        let ArticleUpdate {
            title,
            excerpt,
            content,
            category,
            author,
            featured,
            status,
            image,
        } = update;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(excerpt) = excerpt {
            self.excerpt = excerpt;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(author) = author {
            self.author = author;
        }
        if let Some(featured) = featured {
            self.featured = featured;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(image) = image {
            self.image = (!image.is_empty()).then_some(image);
        }
    }
}

/// The fields of an article supplied by the caller on creation.
///
/// `id` and `date` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewArticle {
    /// Headline. Required.
    pub title: String,
    /// Summary. Required.
    pub excerpt: String,
    /// Body. Required.
    pub content: String,
    /// Registered category name.
    pub category: String,
    /// Byline.
    #[serde(default)]
    pub author: String,
    /// Home page highlight.
    #[serde(default)]
    pub featured: bool,
    /// Initial state, draft unless given.
    #[serde(default)]
    pub status: Status,
    /// External path or inline data URI.
    #[serde(default)]
    pub image: Option<String>,
}

impl NewArticle {
    /// Checks that the required text fields are non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<(), Error> {
        require("title", &self.title)?;
        require("excerpt", &self.excerpt)?;
        require("content", &self.content)
    }

    pub(crate) fn into_article(self, id: ArticleId, date: NaiveDate) -> Article {
        Article {
            id,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            date,
            category: self.category,
            author: self.author,
            featured: self.featured,
            status: self.status,
            image: self.image,
        }
    }
}

/// A partial update. Absent fields are left unchanged.
///
/// Carries no `id` or `date`; those keys are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleUpdate {
    /// New headline.
    pub title: Option<String>,
    /// New summary.
    pub excerpt: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New byline.
    pub author: Option<String>,
    /// New highlight flag.
    pub featured: Option<bool>,
    /// New state.
    pub status: Option<Status>,
    /// New image. An empty string removes the current one.
    pub image: Option<String>,
}

impl ArticleUpdate {
    /// Checks that any supplied required field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("title", &self.title),
            ("excerpt", &self.excerpt),
            ("content", &self.content),
        ] {
            if let Some(value) = value {
                require(field, value)?;
            }
        }
        Ok(())
    }

    /// Whether the update touches no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.author.is_none()
            && self.featured.is_none()
            && self.status.is_none()
            && self.image.is_none()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

/// The next id to assign.
///
/// One more than the largest id in `articles`, or than `high_water` if that
/// is larger. `high_water` is the largest id the caller has ever handed out,
/// which keeps ids from being reused after the newest article is deleted.
#[must_use]
pub fn next_id(articles: &[Article], high_water: ArticleId) -> ArticleId {
    articles
        .iter()
        .map(|article| article.id)
        .max()
        .unwrap_or(0)
        .max(high_water)
        + 1
}

/// The built-in collection served when no other backend is available.
#[must_use]
pub fn seed_collection() -> Vec<Article> {
    vec![
        Article {
            id: 1,
            title: "Launching AI Solutions Pro".to_string(),
            excerpt: "We have started offering a workflow automation suite built on our latest \
                      AI technology, helping companies raise productivity and stay competitive."
                .to_string(),
            content: "<p>We are pleased to announce AI Solutions Pro, a workflow automation \
                      suite built on our latest AI technology.</p>\n<h3>Highlights</h3>\n<ul>\n  \
                      <li>Machine-learning driven process automation</li>\n  <li>Real-time \
                      analytics and reporting</li>\n  <li>An intuitive interface</li>\n  \
                      <li>Straightforward integration with existing systems</li>\n</ul>\n<p>Early \
                      adopters have cut time spent on routine work by up to 60%.</p>"
                .to_string(),
            date: date(2024, 1, 15),
            category: "Press Release".to_string(),
            author: "Communications".to_string(),
            featured: true,
            status: Status::Published,
            image: Some("/ai-technology-office.png".to_string()),
        },
        Article {
            id: 2,
            title: "Tokyo head office is moving".to_string(),
            excerpt: "From March 2024 our Tokyo head office moves to a new building in Shinjuku, \
                      where we will keep serving our customers in a better environment."
                .to_string(),
            content: "<p>Thank you for your continued support.</p>\n<p>As our business grows, \
                      our Tokyo head office is relocating.</p>\n<h3>New address</h3>\n<p>Shinjuku \
                      Building 15F, 1-1-1 Nishi-Shinjuku, Shinjuku-ku, Tokyo 160-0023</p>\n\
                      <h3>Moving date</h3>\n<p>Friday, 1 March 2024</p>"
                .to_string(),
            date: date(2024, 1, 10),
            category: "Notice".to_string(),
            author: "General Affairs".to_string(),
            featured: false,
            status: Status::Published,
            image: Some("/modern-office-building.png".to_string()),
        },
        Article {
            id: 3,
            title: "Year-end holiday schedule".to_string(),
            excerpt: "Our offices will be closed over the year-end holidays. We apologise for \
                      any inconvenience."
                .to_string(),
            content: "<p>Our offices will be closed for the year-end holidays.</p>\n\
                      <h3>Closed</h3>\n<p>Friday 29 December 2023 to Wednesday 3 January \
                      2024</p>\n<h3>Reopening</h3>\n<p>Regular business resumes on Thursday 4 \
                      January 2024. Enquiries received while we are closed will be answered in \
                      order from that day.</p>"
                .to_string(),
            date: date(2023, 12, 20),
            category: "Notice".to_string(),
            author: "General Affairs".to_string(),
            featured: false,
            status: Status::Published,
            image: Some("/placeholder-napyt.png".to_string()),
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
