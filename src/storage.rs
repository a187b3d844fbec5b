//! Physical storage tiers and the precedence between them.

pub mod cache;
pub mod codec;
pub mod durable;
mod seed;
pub mod selector;
pub mod snapshot;

pub use cache::CacheMirror;
pub use durable::DurableStore;
pub use seed::SeedStore;
pub use selector::{BackendKind, BackendSelector, DurableTest, Persistence, Probe, Served};
pub use snapshot::SnapshotFile;

/// A failure inside a single storage tier.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The redb database failed.
    #[error("durable store error: {0}")]
    Durable(#[from] redb::Error),

    /// A file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document is not a valid collection.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}
