//! Backend diagnostics.

use std::sync::Arc;

use axum::{Json, extract::State, http::header, response::IntoResponse};

use crate::api::ApiState;

/// Which tiers are reachable, with a test read of the durable store.
pub async fn probe(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let probe = state.store.read().await.probe();
    ([(header::CACHE_CONTROL, "no-store")], Json(probe))
}
