//! Weather observation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single weather observation. Every measurement is optional because
/// providers rarely report all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub temperature_celsius: Option<f64>,
    #[serde(default)]
    pub humidity_percent: Option<f64>,
    #[serde(default)]
    pub rainfall_mm: Option<f64>,
    #[serde(default)]
    pub wind_speed_mps: Option<f64>,
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Overall growing-weather quality in [0, 1], when the provider rates it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_score: Option<f64>,
}

impl WeatherObservation {
    /// Heat index, only when both temperature and humidity were reported
    pub fn heat_index(&self) -> Option<f64> {
        match (self.temperature_celsius, self.humidity_percent) {
            (Some(t), Some(h)) => Some(heat_index(t, h)),
            _ => None,
        }
    }
}

/// Simplified heat index in Celsius from temperature (Celsius) and relative humidity (%)
pub fn heat_index(temperature_celsius: f64, humidity_percent: f64) -> f64 {
    let temp_f = temperature_celsius * 9.0 / 5.0 + 32.0;
    let hi = 0.5 * (temp_f + 61.0 + (temp_f - 68.0) * 1.2 + humidity_percent * 0.094);
    (hi - 32.0) * 5.0 / 9.0
}
