//! Soil models

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Recognised soil textures, in one-hot column order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    Sandy,
    Loamy,
    Clay,
    Silt,
    SandyLoam,
}

impl SoilType {
    pub const ALL: [SoilType; 5] = [
        SoilType::Sandy,
        SoilType::Loamy,
        SoilType::Clay,
        SoilType::Silt,
        SoilType::SandyLoam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "sandy",
            SoilType::Loamy => "loamy",
            SoilType::Clay => "clay",
            SoilType::Silt => "silt",
            SoilType::SandyLoam => "sandy_loam",
        }
    }

    /// One-hot encoding over [`SoilType::ALL`]
    pub fn one_hot(&self) -> [f64; 5] {
        let mut encoded = [0.0; 5];
        for (slot, candidate) in encoded.iter_mut().zip(Self::ALL.iter()) {
            if candidate == self {
                *slot = 1.0;
            }
        }
        encoded
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SoilType {
    type Err = CoreError;

    /// Case-insensitive; `sandy loam` and `sandy-loam` are accepted for `sandy_loam`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        SoilType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| CoreError::InvalidSoilType(s.to_string()))
    }
}

/// Soil texture plus the farm area it covers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SoilProfile {
    pub soil_type: SoilType,
    /// Farm area in hectares
    pub farm_area: f64,
}

impl SoilProfile {
    pub fn new(soil_type: SoilType, farm_area: f64) -> Self {
        Self {
            soil_type,
            farm_area,
        }
    }
}
