//! Crop catalogue records

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A crop and its free-form agronomic metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CropRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growing_season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_needs: Option<String>,
    /// Preferred soil texture, kept as free text
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "soil_type")]
    pub soil_affinity: Option<String>,
    /// Any further attributes
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Partial update for a [`CropRecord`]. Only supplied fields are applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CropRecordPatch {
    #[serde(default)]
    pub growing_season: Option<String>,
    #[serde(default)]
    pub water_needs: Option<String>,
    #[serde(default, alias = "soil_type")]
    pub soil_affinity: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CropRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Merge a patch into this record; the name never changes
    pub fn apply(&mut self, patch: CropRecordPatch) {
        if let Some(season) = patch.growing_season {
            self.growing_season = Some(season);
        }
        if let Some(water) = patch.water_needs {
            self.water_needs = Some(water);
        }
        if let Some(soil) = patch.soil_affinity {
            self.soil_affinity = Some(soil);
        }
        for (key, value) in patch.extra {
            if key != "name" {
                self.extra.insert(key, value);
            }
        }
    }
}
