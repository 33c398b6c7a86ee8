//! Crop recommendation HTTP handlers

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use shared::{Recommendation, RecommendationRequest};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Recommendation request body
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationInput {
    #[validate(length(min = 1, max = 128))]
    pub location: String,

    /// Market region; defaults to the configured region, then the location
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub region: Option<String>,

    /// Candidate crops; defaults to the configured supported crops
    #[serde(default)]
    #[validate(length(max = 50))]
    pub crops: Vec<String>,

    /// Farm size in hectares
    #[validate(range(min = 0.0, max = 1000000.0))]
    pub farm_size: f64,

    #[serde(default)]
    pub soil_type: Option<String>,

    /// Reference date; defaults to today (UTC)
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl RecommendationInput {
    fn into_request(self, state: &AppState) -> RecommendationRequest {
        let crops = if self.crops.is_empty() {
            state.config.recommendation.supported_crops.clone()
        } else {
            self.crops
        };
        RecommendationRequest {
            location: self.location,
            region: self.region.or_else(|| state.config.recommendation.region.clone()),
            crops,
            farm_size: self.farm_size,
            soil_type: self.soil_type,
            as_of: self
                .as_of
                .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        }
    }
}

/// Rank crops for a location by projected profit
pub async fn recommend_crops(
    State(state): State<AppState>,
    Json(input): Json<RecommendationInput>,
) -> AppResult<Json<Recommendation>> {
    input.validate()?;
    let request = input.into_request(&state);
    tracing::debug!(location = %request.location, crops = request.crops.len(), "Recommendation requested");

    let recommender = state.recommender.clone();
    let recommendation = tokio::task::spawn_blocking(move || recommender.recommend(&request))
        .await
        .map_err(|e| AppError::Internal(format!("recommendation task failed: {}", e)))??;

    Ok(Json(recommendation))
}
