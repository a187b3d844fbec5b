//! Export and import of the whole collection.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::{
    api::{ApiState, Saved, reject},
    storage::codec,
};

/// The collection as a dated JSON attachment.
pub async fn export(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let document = state.store.read().await.export().map_err(reject)?;
    let file_name = codec::export_file_name(chrono::Local::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        document,
    ))
}

/// Replace the collection with an uploaded document, taken verbatim.
pub async fn import(
    State(state): State<Arc<ApiState>>,
    document: String,
) -> Result<Json<Saved<usize>>, (StatusCode, String)> {
    let written = state
        .store
        .write()
        .await
        .import(&document)
        .map_err(reject)?;

    Ok(Json(Saved::from(written)))
}
