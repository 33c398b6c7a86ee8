//! Crop catalogue HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::store::CropRecordStore;
use shared::{CoreError, CropRecord, CropRecordPatch};

use crate::error::{AppError, AppResult};
use crate::services::JsonFileCropStore;
use crate::AppState;

/// Run a store operation off the async runtime while holding the store lock
async fn with_store<T, F>(state: &AppState, op: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut JsonFileCropStore) -> Result<T, CoreError> + Send + 'static,
{
    let store = state.crop_store.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = store
            .lock()
            .map_err(|_| AppError::Internal("crop store lock poisoned".to_string()))?;
        op(&mut guard).map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(format!("crop store task failed: {}", e)))?
}

/// List all crop names
pub async fn list_crops(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let crops = with_store(&state, |store| store.list()).await?;
    Ok(Json(serde_json::json!({ "crops": crops })))
}

/// Get a crop record by name
pub async fn get_crop(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<CropRecord>> {
    let lookup = name.clone();
    with_store(&state, move |store| store.get(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| CoreError::NotFound(format!("crop '{}'", name)).into())
}

/// Create a crop record
pub async fn create_crop(
    State(state): State<AppState>,
    Json(record): Json<CropRecord>,
) -> AppResult<impl IntoResponse> {
    let created = with_store(&state, move |store| {
        let name = record.name.clone();
        store.put(&name, record)?;
        store
            .get(&name)?
            .ok_or_else(|| CoreError::Storage(format!("crop '{}' missing after write", name)))
    })
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update a crop record
pub async fn update_crop(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(patch): Json<CropRecordPatch>,
) -> AppResult<Json<CropRecord>> {
    let updated = with_store(&state, move |store| store.update(&name, patch)).await?;
    Ok(Json(updated))
}
