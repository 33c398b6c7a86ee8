//! Weather snapshots from a JSON file keyed by location
//!
//! The file is re-read on every lookup so an external job can refresh it;
//! wrap the provider in `CachedWeatherProvider` to bound the reads.

use std::collections::HashMap;
use std::path::PathBuf;

use shared::providers::WeatherProvider;
use shared::WeatherObservation;

#[derive(Debug, Clone)]
pub struct JsonWeatherProvider {
    path: PathBuf,
}

impl JsonWeatherProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Option<HashMap<String, WeatherObservation>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Weather snapshot unreadable");
                return None;
            }
        };
        match serde_json::from_str::<HashMap<String, WeatherObservation>>(&raw) {
            Ok(snapshots) => Some(
                snapshots
                    .into_iter()
                    .map(|(location, obs)| (location.trim().to_lowercase(), obs))
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Weather snapshot malformed");
                None
            }
        }
    }
}

impl WeatherProvider for JsonWeatherProvider {
    fn current_weather(&self, location: &str) -> Option<WeatherObservation> {
        self.load()?.remove(&location.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Chiang Mai": {{"temperature_celsius": 27.5, "humidity_percent": 70, "weather_score": 0.9}}}}"#
        )
        .unwrap();

        let provider = JsonWeatherProvider::new(file.path());
        let obs = provider.current_weather("chiang mai").unwrap();
        assert_eq!(obs.temperature_celsius, Some(27.5));
        assert_eq!(obs.weather_score, Some(0.9));
        assert!(obs.rainfall_mm.is_none());
        assert!(provider.current_weather("Bangkok").is_none());
    }

    #[test]
    fn test_missing_file_yields_none() {
        let provider = JsonWeatherProvider::new("/nonexistent/weather.json");
        assert!(provider.current_weather("anywhere").is_none());
    }
}
