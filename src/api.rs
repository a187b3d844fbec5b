//! HTTP interface over an [`ArticleStore`].
//!
//! Provides endpoints for:
//! - the wholesale news document (read, write, data-source probe)
//! - article CRUD and the public views
//! - the category vocabulary
//! - export, import and backend diagnostics

pub mod articles;
pub mod categories;
pub mod debug;
pub mod news;
pub mod snapshot;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, StatusCode},
    routing::{delete, get, post},
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{ArticleStore, Error, Written, storage::BackendKind};

/// Names the tier that served a read.
pub const DATA_SOURCE: HeaderName = HeaderName::from_static("x-data-source");

/// Whether a durable store is bound.
pub const DURABLE_AVAILABLE: HeaderName = HeaderName::from_static("x-durable-available");

pub(crate) const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// Shared state for API handlers.
#[derive(Debug)]
pub struct ApiState {
    /// The process-wide store.
    pub store: RwLock<ArticleStore>,
}

impl ApiState {
    /// Wraps `store` for sharing between handlers.
    #[must_use]
    pub fn new(store: ArticleStore) -> Arc<Self> {
        Arc::new(Self {
            store: RwLock::new(store),
        })
    }
}

/// The result of a write, as returned to clients.
///
/// `warning` is set when the write did not reach the durable store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Saved<T> {
    /// Always `true`; failed writes are reported with an error status.
    pub success: bool,
    /// What the write produced.
    pub data: T,
    /// The tier that received the write.
    pub storage: BackendKind,
    /// Why the write will not outlive the process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Set together with `warning`: a durable store needs configuring.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_setup: bool,
}

impl<T> From<Written<T>> for Saved<T> {
    fn from(written: Written<T>) -> Self {
        let warning = written.persistence.warning();
        Self {
            success: true,
            data: written.value,
            storage: written.persistence.storage(),
            requires_setup: warning.is_some(),
            warning,
        }
    }
}

/// Maps a store error to a status code and message.
pub(crate) fn reject(error: Error) -> (StatusCode, String) {
    let status = match &error {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::ProtectedCategory(_) | Error::InUse { .. } => StatusCode::CONFLICT,
        Error::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    }
    (status, error.to_string())
}

/// Build the API router with all routes.
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Whole-document access
        .route(
            "/api/news",
            get(news::read).head(news::head).post(news::write),
        )
        .route("/api/debug", get(debug::probe))
        // Articles
        .route(
            "/api/articles",
            get(articles::list).post(articles::create),
        )
        .route("/api/articles/featured", get(articles::featured))
        .route("/api/articles/recent", get(articles::recent))
        .route("/api/articles/published/:id", get(articles::get_published))
        .route(
            "/api/articles/:id",
            get(articles::get)
                .patch(articles::update)
                .delete(articles::remove),
        )
        .route("/api/articles/:id/toggle", post(articles::toggle))
        .route("/api/stats", get(articles::stats))
        // Categories
        .route(
            "/api/categories",
            get(categories::list).post(categories::add),
        )
        .route("/api/categories/:name", delete(categories::remove))
        .route("/api/categories/:name/usage", get(categories::usage))
        // Export and import
        .route("/api/export", get(snapshot::export))
        .route("/api/import", post(snapshot::import))
        // Middleware
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                // Only log responses that are not successful
                .on_request(())
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = response.status();
                        if !status.is_success() {
                            tracing::warn!(
                                status = %status,
                                latency_ms = latency.as_millis(),
                                "request failed"
                            );
                        }
                    },
                ),
        )
        .with_state(state)
}

/// Start the API server and run until interrupted.
///
/// # Errors
///
/// Fails if `bind_addr` cannot be bound or the server stops with an I/O
/// error.
pub async fn serve(state: Arc<ApiState>, bind_addr: &str) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!("News API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {e}");
            }
        })
        .await
}
