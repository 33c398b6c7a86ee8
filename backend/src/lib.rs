//! Crop advisor backend
//!
//! Wires the file-backed providers, the crop record store and the trained
//! models into a [`Recommender`] and exposes it over HTTP.

use axum::{routing::get, Router};
use std::sync::{Arc, Mutex};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use shared::cache::CachedWeatherProvider;
use shared::learning::SuitabilityModel;
use shared::recommendation::Recommender;

use crate::external::{CsvMarketProvider, JsonSoilProvider, JsonWeatherProvider};
use crate::services::{train_price_models, train_suitability_model, JsonFileCropStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommender: Arc<Recommender>,
    pub crop_store: Arc<Mutex<JsonFileCropStore>>,
}

impl AppState {
    /// Load data files, train models and open the crop store
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let data = &config.data;

        let market = if data.market_history_path.exists() {
            CsvMarketProvider::open(&data.market_history_path)?
        } else {
            tracing::warn!(
                path = %data.market_history_path.display(),
                "Market history not found, every crop will be skipped"
            );
            CsvMarketProvider::default()
        };
        let soil = JsonSoilProvider::open(&data.soil_profiles_path)?;
        let weather = CachedWeatherProvider::with_clock(
            JsonWeatherProvider::new(&data.weather_snapshot_path),
            chrono::Duration::seconds(config.cache.weather_ttl_seconds),
            shared::cache::SystemClock,
        );

        let price_models = train_price_models(
            &market,
            &config.recommendation.supported_crops,
            config.recommendation.region.as_deref(),
        );
        let suitability = match &data.training_data_path {
            Some(path) if path.exists() => train_suitability_model(path)?,
            Some(path) => {
                tracing::warn!(path = %path.display(), "Training data not found, suitability model untrained");
                SuitabilityModel::new()
            }
            None => SuitabilityModel::new(),
        };

        let recommender = Recommender::new(
            config.recommender_settings(),
            Box::new(weather),
            Box::new(market),
            Box::new(soil),
        )?
        .with_price_models(price_models)
        .with_suitability_model(suitability);

        let crop_store = JsonFileCropStore::open(&data.crop_database_path)?;

        Ok(Self {
            config: Arc::new(config),
            recommender: Arc::new(recommender),
            crop_store: Arc::new(Mutex::new(crop_store)),
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Advisor API v1.0"
}
