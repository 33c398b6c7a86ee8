//! Fixtures shared by the integration tests

use std::path::Path;

use crop_advisor::config::{CacheConfig, Config, DataConfig, RecommendationConfig, ServerConfig};
use shared::{CostCategory, RiskLevel};

pub const MARKET_CSV: &str = "\
date,crop,region,price,demand_index,supply_index
2024-01-01,rice,,300,0.6,0.4
2024-02-01,rice,,310,0.6,0.4
2024-03-01,rice,,320,0.7,0.4
2024-04-01,rice,,330,0.7,0.3
2024-05-01,rice,,340,0.7,0.3
2024-01-01,wheat,,200,0.5,0.5
2024-02-01,wheat,,205,0.5,0.5
2024-03-01,wheat,,210,0.5,0.5
2024-04-01,wheat,,220,0.5,0.5
2024-05-01,wheat,,230,0.5,0.5
";

pub const WEATHER_JSON: &str = r#"{
  "Khon Kaen": {
    "temperature_celsius": 31.0,
    "humidity_percent": 65.0,
    "rainfall_mm": 12.0,
    "wind_speed_mps": 2.5,
    "soil_moisture": 0.3,
    "weather_score": 0.9
  }
}"#;

pub const SOIL_JSON: &str = r#"{"Khon Kaen": {"soil_type": "sandy_loam", "farm_area": 2.0}}"#;

/// Write the fixture data files into `dir` and return a config pointing at them
pub fn write_fixture(dir: &Path) -> Config {
    std::fs::write(dir.join("market.csv"), MARKET_CSV).unwrap();
    std::fs::write(dir.join("weather.json"), WEATHER_JSON).unwrap();
    std::fs::write(dir.join("soil.json"), SOIL_JSON).unwrap();

    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        data: DataConfig {
            crop_database_path: dir.join("crops.json"),
            market_history_path: dir.join("market.csv"),
            weather_snapshot_path: dir.join("weather.json"),
            soil_profiles_path: dir.join("soil.json"),
            training_data_path: None,
        },
        recommendation: RecommendationConfig {
            region: None,
            supported_crops: vec!["rice".to_string(), "wheat".to_string()],
            forecast_periods: 6,
            history_days: 365,
            risk_factor: 0.1,
            risk_level: RiskLevel::Medium,
            management_efficiency: 0.9,
            base_yield: 1.0,
            default_weather_quality: 0.8,
            default_soil_quality: 0.8,
            confidence_level: 0.95,
            input_costs: [
                (CostCategory::Seeds, 100.0),
                (CostCategory::Fertilizer, 200.0),
                (CostCategory::Irrigation, 150.0),
                (CostCategory::Labor, 300.0),
                (CostCategory::Equipment, 250.0),
            ]
            .into_iter()
            .collect(),
        },
        cache: CacheConfig {
            weather_ttl_seconds: 3600,
        },
    }
}
