use crate::{domain::ArticleId, storage::BackendError};

/// Errors surfaced to callers of the [`ArticleStore`](crate::ArticleStore).
///
/// Read-side backend failures never show up here: they are absorbed by the
/// fallback chain in [`BackendSelector`](crate::storage::BackendSelector).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required article field was empty, the category was unknown, or an
    /// import document was malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Default categories cannot be removed.
    #[error("category '{0}' is a default category and cannot be removed")]
    ProtectedCategory(String),

    /// The category is still referenced by articles.
    #[error("category '{name}' is used by {count} article(s)")]
    InUse {
        /// The category that was to be removed.
        name: String,
        /// How many articles reference it.
        count: usize,
    },

    /// No article has the given id.
    #[error("article {0} not found")]
    NotFound(ArticleId),

    /// An operation needed a backend that is not bound.
    #[error("{0} backend is unavailable")]
    BackendUnavailable(&'static str),

    /// A backend failed in a way the fallback chain cannot absorb.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
