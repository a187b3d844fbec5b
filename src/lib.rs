//! A news article store with interchangeable storage tiers.
//!
//! Articles live in a single collection that is read and written as a whole.
//! The [`ArticleStore`] serves it from a durable redb database when one is
//! bound, otherwise from a static snapshot file, otherwise from a built-in
//! seed collection.

pub mod domain;
pub use domain::{
    Article, ArticleFilter, ArticleId, ArticleUpdate, BackendChoice, CategoryRegistry, Config,
    NewArticle, Stats, Status,
};

mod error;
pub use error::Error;

pub mod storage;

mod store;
pub use store::{ArticleStore, Written};

pub mod api;
