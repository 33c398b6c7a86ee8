//! Recommendation output models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MarketAnalysis, ProfitabilityResult, RiskMetrics, SoilProfile, WeatherObservation};

/// Forecast prices from a crop's trained regressor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceForecast {
    pub prices: Vec<f64>,
    /// R² of the regressor on the history it forecast from; descriptive only
    pub confidence: f64,
}

/// Summary statistics over a [`PriceForecast`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceOutlook {
    pub mean_price: f64,
    pub price_trend: f64,
    pub price_volatility: f64,
    pub confidence_score: f64,
    /// Zero-based forecast period with the highest price
    pub best_selling_period: usize,
}

/// A recommendation request for one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRequest {
    /// Location used for weather and soil lookups
    pub location: String,
    /// Market region; falls back to the location when absent
    #[serde(default)]
    pub region: Option<String>,
    pub crops: Vec<String>,
    /// Farm size in hectares
    pub farm_size: f64,
    /// Soil texture as free text; resolved through the soil provider when absent
    #[serde(default)]
    pub soil_type: Option<String>,
    /// Reference date for seasonal features and the market history window
    pub as_of: NaiveDate,
}

/// Analysis of a single candidate crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropRecommendation {
    pub crop: String,
    /// Probability of this crop under the suitability model, absent when untrained
    pub suitability_score: Option<f64>,
    pub price_forecast: Option<PriceForecast>,
    pub price_outlook: Option<PriceOutlook>,
    pub market_analysis: MarketAnalysis,
    pub trend_forecast: Vec<f64>,
    pub profitability: ProfitabilityResult,
    pub risk_metrics: RiskMetrics,
}

/// A crop left out of the ranking and why
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedCrop {
    pub crop: String,
    pub reason: String,
}

/// Ranked output of a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub location: String,
    pub soil: SoilProfile,
    pub weather: Option<WeatherObservation>,
    /// Highest projected profit first
    pub ranked: Vec<CropRecommendation>,
    pub skipped: Vec<SkippedCrop>,
}

impl Recommendation {
    pub fn best(&self) -> Option<&CropRecommendation> {
        self.ranked.first()
    }

    pub fn crop_names(&self) -> Vec<&str> {
        self.ranked.iter().map(|r| r.crop.as_str()).collect()
    }
}
