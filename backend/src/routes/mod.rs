//! Route definitions for the crop advisor API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/recommendations", post(handlers::recommend_crops))
        .nest("/crops", crop_routes())
}

/// Crop catalogue routes
fn crop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_crops).post(handlers::create_crop))
        .route("/:name", get(handlers::get_crop).put(handlers::update_crop))
}
