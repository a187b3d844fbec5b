//! Domain models for the news collection.
//!
//! Articles, the category vocabulary, list filters, dashboard stats and the
//! configuration that selects a storage tier.

pub mod article;
pub use article::{Article, ArticleId, ArticleUpdate, NewArticle, Status};

pub mod category;
pub use category::CategoryRegistry;

mod config;
pub use config::{BackendChoice, Config};

pub mod filter;
pub use filter::{ArticleFilter, FilterParams, Search};

mod stats;
pub use stats::Stats;
