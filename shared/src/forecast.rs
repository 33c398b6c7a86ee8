//! Price trend forecasting
//!
//! A stateless recurrence: each period adds a weighted blend of the
//! historical trend, the mean seasonal factor and the market sentiment to the
//! previous period's price.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::PriceOutlook;
use crate::stats;
use crate::validation::{validate_finite, validate_price_series};

/// Weights of the trend recurrence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceWeights {
    pub historical_trend: f64,
    pub seasonal_factor: f64,
    pub market_sentiment: f64,
    /// Carried for configuration parity; no term in the recurrence uses it.
    pub supply_demand: f64,
}

impl Default for PriceWeights {
    fn default() -> Self {
        Self {
            historical_trend: 0.3,
            seasonal_factor: 0.2,
            market_sentiment: 0.2,
            supply_demand: 0.3,
        }
    }
}

/// A named sentiment signal with its caller-supplied weight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketIndicator {
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

impl MarketIndicator {
    pub fn new(name: impl Into<String>, score: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            score,
            weight,
        }
    }
}

/// Weighted sum of indicator scores
pub fn sentiment_score(indicators: &[MarketIndicator]) -> f64 {
    indicators.iter().map(|i| i.score * i.weight).sum()
}

/// Forecast `periods` prices with the default weights.
pub fn forecast_price_trend(
    historical_prices: &[f64],
    seasonal_factors: &[f64],
    market_indicators: &[MarketIndicator],
    periods: usize,
) -> CoreResult<Vec<f64>> {
    forecast_price_trend_with(
        &PriceWeights::default(),
        historical_prices,
        seasonal_factors,
        market_indicators,
        periods,
    )
}

/// Forecast `periods` prices with explicit weights.
///
/// Every value is clamped to be non-negative, and the clamped value seeds the
/// next period.
pub fn forecast_price_trend_with(
    weights: &PriceWeights,
    historical_prices: &[f64],
    seasonal_factors: &[f64],
    market_indicators: &[MarketIndicator],
    periods: usize,
) -> CoreResult<Vec<f64>> {
    if historical_prices.is_empty() {
        return Err(CoreError::Computation(
            "cannot fit a trend to an empty price history".to_string(),
        ));
    }
    validate_price_series("historical_prices", historical_prices)?;
    for factor in seasonal_factors {
        validate_finite("seasonal_factors", *factor)?;
    }
    for indicator in market_indicators {
        validate_finite(&indicator.name, indicator.score)?;
        validate_finite(&indicator.name, indicator.weight)?;
    }

    let historical_trend = stats::linear_slope(historical_prices).unwrap_or(0.0);
    let seasonal_component = stats::mean(seasonal_factors).unwrap_or(0.0);
    let sentiment = sentiment_score(market_indicators);

    let step = weights.historical_trend * historical_trend
        + weights.seasonal_factor * seasonal_component
        + weights.market_sentiment * sentiment;
    if !step.is_finite() {
        return Err(CoreError::Computation("forecast step overflowed".to_string()));
    }

    let mut previous = historical_prices[historical_prices.len() - 1];
    let mut forecast = Vec::with_capacity(periods);
    for _ in 0..periods {
        let next = (previous + step).max(0.0);
        forecast.push(next);
        previous = next;
    }
    Ok(forecast)
}

/// Summarise a forecast series. `None` when the series is empty.
pub fn price_outlook(prices: &[f64], confidence: f64) -> Option<PriceOutlook> {
    let mean_price = stats::mean(prices)?;
    let best_selling_period = prices
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
        .0;
    Some(PriceOutlook {
        mean_price,
        price_trend: stats::linear_slope(prices).unwrap_or(0.0),
        price_volatility: stats::population_std(prices).unwrap_or(0.0),
        confidence_score: confidence,
        best_selling_period,
    })
}
