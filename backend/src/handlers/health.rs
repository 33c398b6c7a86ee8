//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub suitability_model: String,
    pub price_models: Vec<String>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let suitability_model = if state.recommender.suitability_model().is_trained() {
        "trained"
    } else {
        "untrained"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        suitability_model: suitability_model.to_string(),
        price_models: state
            .recommender
            .price_models()
            .trained_crops()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
