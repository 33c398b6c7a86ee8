//! Configuration management for the crop advisor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CROP__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use shared::recommendation::{IndicatorWeights, RecommenderSettings};
use shared::{clamp_unit, validate_unit_interval, CostCategory, RiskLevel};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Data file locations
    pub data: DataConfig,

    /// Recommendation tunables
    pub recommendation: RecommendationConfig,

    /// Provider caching
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// JSON crop record store
    pub crop_database_path: PathBuf,

    /// CSV market price history
    pub market_history_path: PathBuf,

    /// JSON weather snapshots keyed by location
    pub weather_snapshot_path: PathBuf,

    /// JSON soil profiles keyed by location
    pub soil_profiles_path: PathBuf,

    /// Labelled CSV for the suitability classifier
    #[serde(default)]
    pub training_data_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendationConfig {
    /// Market region used when a request names none
    #[serde(default)]
    pub region: Option<String>,

    /// Crops with a price model trained at startup
    pub supported_crops: Vec<String>,

    pub forecast_periods: usize,
    pub history_days: i64,
    pub risk_factor: f64,
    pub risk_level: RiskLevel,
    pub management_efficiency: f64,
    pub base_yield: f64,
    pub default_weather_quality: f64,
    pub default_soil_quality: f64,
    pub confidence_level: f64,

    /// Per-hectare input costs
    pub input_costs: BTreeMap<CostCategory, f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Weather observation time-to-live
    pub weather_ttl_seconds: i64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROP__ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("data.crop_database_path", "data/crops.json")?
            .set_default("data.market_history_path", "data/crop_market_history.csv")?
            .set_default("data.weather_snapshot_path", "data/weather.json")?
            .set_default("data.soil_profiles_path", "data/soil_profiles.json")?
            .set_default(
                "recommendation.supported_crops",
                vec!["rice", "wheat", "maize", "cotton", "sugarcane"],
            )?
            .set_default("recommendation.forecast_periods", 12)?
            .set_default("recommendation.history_days", 365)?
            .set_default("recommendation.risk_factor", 0.1)?
            .set_default("recommendation.risk_level", "medium")?
            .set_default("recommendation.management_efficiency", 0.9)?
            .set_default("recommendation.base_yield", 1.0)?
            .set_default("recommendation.default_weather_quality", 0.8)?
            .set_default("recommendation.default_soil_quality", 0.8)?
            .set_default("recommendation.confidence_level", 0.95)?
            .set_default("recommendation.input_costs.seeds", 100.0)?
            .set_default("recommendation.input_costs.fertilizer", 200.0)?
            .set_default("recommendation.input_costs.irrigation", 150.0)?
            .set_default("recommendation.input_costs.labor", 300.0)?
            .set_default("recommendation.input_costs.equipment", 250.0)?
            .set_default("cache.weather_ttl_seconds", 3600)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROP__ prefix)
            .add_source(
                Environment::with_prefix("CROP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Engine settings. Factors are clamped to [0, 1] here; the engine
    /// itself does not clamp.
    pub fn recommender_settings(&self) -> RecommenderSettings {
        let rec = &self.recommendation;
        RecommenderSettings {
            input_costs: rec.input_costs.clone(),
            management_efficiency: unit_factor("management_efficiency", rec.management_efficiency),
            base_yield: rec.base_yield,
            risk_factor: unit_factor("risk_factor", rec.risk_factor),
            default_weather_quality: unit_factor("default_weather_quality", rec.default_weather_quality),
            default_soil_quality: unit_factor("default_soil_quality", rec.default_soil_quality),
            forecast_periods: rec.forecast_periods,
            history_days: rec.history_days,
            confidence_level: rec.confidence_level,
            risk_level: rec.risk_level,
            indicator_weights: IndicatorWeights::default(),
        }
    }
}

/// Clamp a configured factor into [0, 1], warning when it was out of range
fn unit_factor(field: &str, value: f64) -> f64 {
    if let Err(e) = validate_unit_interval(field, value) {
        tracing::warn!(field = %field, value, error = %e, "Configured factor clamped to [0, 1]");
    }
    clamp_unit(value)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
