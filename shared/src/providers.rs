//! Capabilities for external data sources
//!
//! Providers never fail loudly: an unreachable or empty source yields `None`
//! or an empty series and the orchestrator treats that as missing data.

use crate::models::{PriceRecord, SoilProfile, WeatherObservation};
use crate::types::DateRange;

/// Current weather for a location
pub trait WeatherProvider: Send + Sync {
    fn current_weather(&self, location: &str) -> Option<WeatherObservation>;
}

/// Historical market prices for a commodity in a region
pub trait MarketProvider: Send + Sync {
    fn market_history(&self, region: &str, commodity: &str, range: &DateRange) -> Vec<PriceRecord>;
}

/// Soil profile for a location
pub trait SoilProvider: Send + Sync {
    fn soil_profile(&self, location: &str) -> Option<SoilProfile>;
}

/// Provider for deployments without a source of this kind
#[derive(Debug, Clone, Copy, Default)]
pub struct NoData;

impl WeatherProvider for NoData {
    fn current_weather(&self, _location: &str) -> Option<WeatherObservation> {
        None
    }
}

impl MarketProvider for NoData {
    fn market_history(&self, _region: &str, _commodity: &str, _range: &DateRange) -> Vec<PriceRecord> {
        Vec::new()
    }
}

impl SoilProvider for NoData {
    fn soil_profile(&self, _location: &str) -> Option<SoilProfile> {
        None
    }
}
