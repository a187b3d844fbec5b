//! The category vocabulary.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiState, reject},
    domain::category::usage_count,
};

/// A registered category.
#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    /// The category name.
    pub name: String,
    /// Whether it is a protected default.
    pub protected: bool,
    /// Number of articles tagged with it.
    pub usage: usize,
}

/// Body of a category registration.
#[derive(Debug, Deserialize)]
pub struct NewCategory {
    /// The name to register.
    pub name: String,
}

/// Outcome of adding or removing a category.
#[derive(Debug, Serialize)]
pub struct CategoryChange {
    /// The category name.
    pub name: String,
    /// `false` when the registry already was in the requested state.
    pub changed: bool,
}

/// Usage of one category.
#[derive(Debug, Serialize)]
pub struct CategoryUsage {
    /// The category name.
    pub name: String,
    /// Number of articles tagged with it.
    pub count: usize,
}

/// All categories, defaults first.
pub async fn list(State(state): State<Arc<ApiState>>) -> Json<Vec<CategoryEntry>> {
    let store = state.store.read().await;
    let registry = store.categories();
    let articles = store.served().articles;

    let entries = registry
        .list()
        .map(|name| CategoryEntry {
            name: name.to_string(),
            protected: registry.is_default(name),
            usage: usage_count(&articles, name),
        })
        .collect();

    Json(entries)
}

/// Register a custom category. Adding an existing name is a no-op.
pub async fn add(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<NewCategory>,
) -> Result<(StatusCode, Json<CategoryChange>), (StatusCode, String)> {
    let added = state
        .store
        .write()
        .await
        .add_category(&body.name)
        .map_err(reject)?;

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(CategoryChange {
            name: body.name,
            changed: added,
        }),
    ))
}

/// Remove a custom category that no article uses.
pub async fn remove(
    State(state): State<Arc<ApiState>>,
    Path(name): Path<String>,
) -> Result<Json<CategoryChange>, (StatusCode, String)> {
    let removed = state
        .store
        .write()
        .await
        .remove_category(&name)
        .map_err(reject)?;

    if !removed {
        return Err((
            StatusCode::NOT_FOUND,
            format!("category '{name}' not found"),
        ));
    }

    Ok(Json(CategoryChange {
        name,
        changed: true,
    }))
}

/// Number of articles in a category.
pub async fn usage(
    State(state): State<Arc<ApiState>>,
    Path(name): Path<String>,
) -> Json<CategoryUsage> {
    let count = state.store.read().await.usage_count(&name);
    Json(CategoryUsage { name, count })
}
