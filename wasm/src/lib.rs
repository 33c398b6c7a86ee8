//! WebAssembly module for the crop advisor
//!
//! Provides client-side computation for:
//! - Profitability analysis of a single crop
//! - Price trend forecasts
//! - Break-even prices and seasonal factors
//! - Soil type validation

use chrono::NaiveDate;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use shared::forecast::{forecast_price_trend, MarketIndicator};
use shared::profitability::ProfitCalculator;
use shared::{GrowingConditions, InputCosts, MarketTerms, SoilType};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Profitability request as sent by the browser client
#[derive(Debug, Deserialize)]
struct ProfitabilityInput {
    crop: String,
    area: f64,
    market: MarketTerms,
    conditions: GrowingConditions,
    #[serde(default)]
    input_costs: InputCosts,
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Run a profitability analysis from a JSON request; returns JSON
pub fn analyze_profitability_str(input_json: &str) -> Result<String, String> {
    let input: ProfitabilityInput =
        serde_json::from_str(input_json).map_err(|e| format!("Invalid profitability JSON: {}", e))?;
    let result = ProfitCalculator::new()
        .analyze_profitability(
            &input.crop,
            input.area,
            &input.market,
            &input.conditions,
            &input.input_costs,
        )
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

/// Forecast prices; `indicators_json` is an array of `{name, score, weight}`
pub fn forecast_prices(
    historical_prices: &[f64],
    seasonal_factors: &[f64],
    indicators_json: &str,
    periods: usize,
) -> Result<Vec<f64>, String> {
    let indicators: Vec<MarketIndicator> = if indicators_json.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(indicators_json).map_err(|e| format!("Invalid indicators JSON: {}", e))?
    };
    forecast_price_trend(historical_prices, seasonal_factors, &indicators, periods)
        .map_err(|e| e.to_string())
}

/// Seasonal factor for a calendar date; `None` for an invalid date
pub fn seasonal_factor_on(year: i32, month: u32, day: u32) -> Option<f64> {
    NaiveDate::from_ymd_opt(year, month, day).map(shared::features::seasonal_factor)
}

/// Analyze profitability of one crop from a JSON request
#[wasm_bindgen]
pub fn analyze_profitability(input_json: &str) -> Result<String, JsValue> {
    analyze_profitability_str(input_json).map_err(to_js_error)
}

/// Forecast a price path from history, seasonal factors and indicators
#[wasm_bindgen]
pub fn forecast_price_path(
    historical_prices: Vec<f64>,
    seasonal_factors: Vec<f64>,
    indicators_json: &str,
    periods: usize,
) -> Result<Vec<f64>, JsValue> {
    forecast_prices(&historical_prices, &seasonal_factors, indicators_json, periods).map_err(to_js_error)
}

/// Break-even price per ton; infinite without yield
#[wasm_bindgen]
pub fn calculate_break_even_price(total_cost: f64, estimated_yield: f64) -> f64 {
    ProfitCalculator::new().calculate_break_even_price(total_cost, estimated_yield)
}

/// Seasonal factor for a date, or NaN for an invalid date
#[wasm_bindgen]
pub fn seasonal_factor(year: i32, month: u32, day: u32) -> f64 {
    seasonal_factor_on(year, month, day).unwrap_or(f64::NAN)
}

/// Heat index in Celsius
#[wasm_bindgen]
pub fn heat_index_celsius(temperature_celsius: f64, humidity_percent: f64) -> f64 {
    shared::heat_index(temperature_celsius, humidity_percent)
}

/// Check a free-text soil type against the recognised textures
#[wasm_bindgen]
pub fn is_valid_soil_type(soil_type: &str) -> bool {
    soil_type.parse::<SoilType>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_analyze_profitability_str() {
        let request = r#"{
            "crop": "rice",
            "area": 2.0,
            "market": {"price_per_ton": 300.0, "risk_factor": 0.1},
            "conditions": {"weather_quality": 1.0, "soil_quality": 1.0, "management_efficiency": 1.0, "base_yield": 1.0},
            "input_costs": {"seeds": 400.0, "labor": 600.0}
        }"#;
        let out = analyze_profitability_str(request).unwrap();
        let result: ProfitabilityResult = serde_json::from_str(&out).unwrap();
        assert_eq!(result.total_cost, 2000.0);
        assert_relative_eq!(result.projected_profit, -1260.0);
    }

    #[test]
    fn test_analyze_profitability_rejects_bad_json() {
        assert!(analyze_profitability_str("{").is_err());
    }

    #[test]
    fn test_forecast_prices() {
        let prices = forecast_prices(&[10.0, 20.0], &[], "", 2).unwrap();
        assert_relative_eq!(prices[0], 23.0);
        assert_relative_eq!(prices[1], 26.0);

        let indicators = r#"[{"name": "demand", "score": 1.0, "weight": 5.0}]"#;
        let boosted = forecast_prices(&[10.0], &[], indicators, 1).unwrap();
        assert_relative_eq!(boosted[0], 11.0);

        assert!(forecast_prices(&[], &[], "", 3).is_err());
    }

    #[test]
    fn test_break_even_and_seasonal() {
        assert_eq!(calculate_break_even_price(100.0, 4.0), 25.0);
        assert_eq!(calculate_break_even_price(100.0, 0.0), f64::INFINITY);
        assert_relative_eq!(seasonal_factor(2024, 3, 1), 1.0);
        assert!(seasonal_factor(2024, 2, 30).is_nan());
    }

    #[test]
    fn test_soil_type_validation() {
        assert!(is_valid_soil_type("Sandy Loam"));
        assert!(is_valid_soil_type("clay"));
        assert!(!is_valid_soil_type("peat"));
    }
}
