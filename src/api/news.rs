//! The wholesale news document.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::{
    Article,
    api::{ApiState, DATA_SOURCE, DURABLE_AVAILABLE, NO_STORE, Saved, reject},
};

/// The whole collection, uncached, tagged with the tier that served it.
pub async fn read(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let served = state.store.read().await.served();
    tracing::debug!(
        "Serving {} articles from {}",
        served.articles.len(),
        served.source
    );

    (
        [
            (header::CACHE_CONTROL, NO_STORE),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
            (DATA_SOURCE, served.source.as_str()),
        ],
        Json::<Vec<Article>>(served.articles),
    )
}

/// Data-source headers only.
pub async fn head(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let store = state.store.read().await;
    let durable = if store.is_durable() { "true" } else { "false" };

    [
        (DATA_SOURCE, store.served().source.as_str()),
        (DURABLE_AVAILABLE, durable),
    ]
}

/// Replaces the whole collection with the posted array.
///
/// Without a durable store the write still succeeds, held in memory, and
/// the response carries a warning.
pub async fn write(
    State(state): State<Arc<ApiState>>,
    Json(document): Json<serde_json::Value>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let written = state
        .store
        .write()
        .await
        .replace_all(document)
        .map_err(reject)?;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(Saved::from(written)),
    ))
}
