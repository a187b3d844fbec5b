//! Article CRUD and the public views.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    Article, ArticleFilter, ArticleId, ArticleUpdate, NewArticle, Stats,
    api::{ApiState, Saved, reject},
    domain::FilterParams,
};

const DEFAULT_RECENT: usize = 3;

/// Query for [`recent`].
#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    /// How many articles to return.
    pub limit: Option<usize>,
}

/// List articles, optionally filtered by status, category, text or flag.
pub async fn list(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<FilterParams>,
) -> Json<Vec<Article>> {
    let filter = ArticleFilter::from(params);
    Json(state.store.read().await.list(&filter))
}

/// Get a specific article, draft or not.
pub async fn get(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<ArticleId>,
) -> Result<Json<Article>, (StatusCode, String)> {
    state.store.read().await.get(id).map(Json).map_err(reject)
}

/// Get a published article. Drafts are reported as missing.
pub async fn get_published(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<ArticleId>,
) -> Result<Json<Article>, (StatusCode, String)> {
    state
        .store
        .read()
        .await
        .get_published(id)
        .map(Json)
        .map_err(reject)
}

/// Published, featured articles.
pub async fn featured(State(state): State<Arc<ApiState>>) -> Json<Vec<Article>> {
    Json(state.store.read().await.featured())
}

/// The latest published articles.
pub async fn recent(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<RecentParams>,
) -> Json<Vec<Article>> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT);
    Json(state.store.read().await.recent(limit))
}

/// Dashboard counts.
pub async fn stats(State(state): State<Arc<ApiState>>) -> Json<Stats> {
    Json(state.store.read().await.stats())
}

/// Create an article.
pub async fn create(
    State(state): State<Arc<ApiState>>,
    Json(fields): Json<NewArticle>,
) -> Result<(StatusCode, Json<Saved<Article>>), (StatusCode, String)> {
    let written = state
        .store
        .write()
        .await
        .create(fields)
        .map_err(reject)?;

    Ok((StatusCode::CREATED, Json(Saved::from(written))))
}

/// Update the supplied fields of an article.
pub async fn update(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<ArticleId>,
    Json(changes): Json<ArticleUpdate>,
) -> Result<Json<Saved<Article>>, (StatusCode, String)> {
    let written = state
        .store
        .write()
        .await
        .update(id, changes)
        .map_err(reject)?;

    Ok(Json(Saved::from(written)))
}

/// Flip an article between draft and published.
pub async fn toggle(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<ArticleId>,
) -> Result<Json<Saved<Article>>, (StatusCode, String)> {
    let written = state
        .store
        .write()
        .await
        .toggle_status(id)
        .map_err(reject)?;

    Ok(Json(Saved::from(written)))
}

/// Delete an article. Returns the removed article.
pub async fn remove(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<ArticleId>,
) -> Result<Json<Saved<Article>>, (StatusCode, String)> {
    let written = state.store.write().await.delete(id).map_err(reject)?;

    Ok(Json(Saved::from(written)))
}
