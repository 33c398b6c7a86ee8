//! Soil profiles from a JSON file keyed by location

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use shared::providers::SoilProvider;
use shared::{SoilProfile, SoilType};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct SoilEntry {
    soil_type: String,
    #[serde(default = "default_area")]
    farm_area: f64,
}

fn default_area() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default)]
pub struct JsonSoilProvider {
    profiles: HashMap<String, SoilProfile>,
}

impl JsonSoilProvider {
    /// Load profiles; a missing file gives an empty provider
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Soil profiles not found, continuing without");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("cannot read soil profiles {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        let entries: HashMap<String, SoilEntry> = serde_json::from_str(raw)
            .map_err(|e| AppError::Configuration(format!("malformed soil profiles: {}", e)))?;
        let mut profiles = HashMap::with_capacity(entries.len());
        for (location, entry) in entries {
            let soil_type: SoilType = entry.soil_type.parse()?;
            profiles.insert(
                location.trim().to_lowercase(),
                SoilProfile::new(soil_type, entry.farm_area),
            );
        }
        Ok(Self { profiles })
    }
}

impl SoilProvider for JsonSoilProvider {
    fn soil_profile(&self, location: &str) -> Option<SoilProfile> {
        self.profiles.get(&location.trim().to_lowercase()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CoreError;

    #[test]
    fn test_profiles_by_location() {
        let provider = JsonSoilProvider::from_json(
            r#"{"Khon Kaen": {"soil_type": "sandy loam", "farm_area": 3.5}, "Ayutthaya": {"soil_type": "clay"}}"#,
        )
        .unwrap();
        let khon_kaen = provider.soil_profile("khon kaen").unwrap();
        assert_eq!(khon_kaen.soil_type, SoilType::SandyLoam);
        assert_eq!(khon_kaen.farm_area, 3.5);
        assert_eq!(provider.soil_profile("AYUTTHAYA").unwrap().farm_area, 1.0);
        assert!(provider.soil_profile("Phuket").is_none());
    }

    #[test]
    fn test_unknown_soil_type_rejected() {
        let err = JsonSoilProvider::from_json(r#"{"x": {"soil_type": "peat"}}"#).unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::InvalidSoilType(_))));
    }
}
