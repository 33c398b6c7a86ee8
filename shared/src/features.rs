//! Feature construction for the suitability and price models.
//!
//! Column order is fixed by [`CROP_FEATURE_NAMES`] and [`PRICE_FEATURE_NAMES`].
//! Models trained on one order and fed another produce garbage without any
//! error, so every vector in the system is built here and nowhere else.

use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

use crate::error::{CoreError, CoreResult};
use crate::models::{MarketSnapshot, SoilProfile, WeatherObservation};
use crate::stats;
use crate::validation::{validate_farm_size, validate_finite, validate_price_series};

pub const WEATHER_FEATURES: [&str; 6] = [
    "temperature",
    "humidity",
    "rainfall",
    "wind_speed",
    "soil_moisture",
    "heat_index",
];

pub const SOIL_FEATURES: [&str; 6] = [
    "farm_size",
    "soil_sandy",
    "soil_loamy",
    "soil_clay",
    "soil_silt",
    "soil_sandy_loam",
];

pub const MARKET_FEATURES: [&str; 5] = [
    "current_price",
    "demand_index",
    "supply_index",
    "market_trend",
    "seasonal_factor",
];

pub const SEASONAL_FEATURES: [&str; 6] = [
    "day_of_year",
    "month",
    "season",
    "month_cos",
    "day_sin",
    "day_cos",
];

/// Crop feature order: weather ++ soil ++ market ++ seasonal
pub const CROP_FEATURE_NAMES: [&str; CROP_FEATURE_DIM] = [
    "temperature",
    "humidity",
    "rainfall",
    "wind_speed",
    "soil_moisture",
    "heat_index",
    "farm_size",
    "soil_sandy",
    "soil_loamy",
    "soil_clay",
    "soil_silt",
    "soil_sandy_loam",
    "current_price",
    "demand_index",
    "supply_index",
    "market_trend",
    "seasonal_factor",
    "day_of_year",
    "month",
    "season",
    "month_cos",
    "day_sin",
    "day_cos",
];

pub const CROP_FEATURE_DIM: usize = 23;

/// Price feature column order
pub const PRICE_FEATURE_NAMES: [&str; PRICE_FEATURE_DIM] = [
    "price",
    "ma_7",
    "ma_30",
    "momentum_7",
    "volatility_14",
    "demand_index",
    "supply_index",
];

pub const PRICE_FEATURE_DIM: usize = 7;

/// Index of the raw price column in a price feature row
pub const PRICE_COLUMN: usize = 0;

const SHORT_WINDOW: usize = 7;
const LONG_WINDOW: usize = 30;
const MOMENTUM_LAG: usize = 7;
const VOLATILITY_WINDOW: usize = 14;

/// A crop feature vector in [`CROP_FEATURE_NAMES`] order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Wrap externally sourced values (e.g. a training file row), checking width
    pub fn from_values(values: Vec<f64>) -> CoreResult<Self> {
        if values.len() != CROP_FEATURE_DIM {
            return Err(CoreError::validation(
                "features",
                format!("expected {} features, got {}", CROP_FEATURE_DIM, values.len()),
            ));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(CoreError::validation(CROP_FEATURE_NAMES[i], "must be a finite number"));
        }
        Ok(Self { values })
    }

    pub fn names(&self) -> &'static [&'static str] {
        &CROP_FEATURE_NAMES
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        CROP_FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

/// Price features, one row per historical period, in [`PRICE_FEATURE_NAMES`] order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn names(&self) -> &'static [&'static str] {
        &PRICE_FEATURE_NAMES
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[index]).collect()
    }

    pub fn last_row(&self) -> Option<&[f64]> {
        self.rows.last().map(|r| r.as_slice())
    }
}

/// Calendar-derived features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalFeatures {
    pub day_of_year: f64,
    pub month: f64,
    pub season: f64,
    pub month_sin: f64,
    pub month_cos: f64,
    pub day_sin: f64,
    pub day_cos: f64,
}

/// Sinusoidal seasonal factor: sin(2π · month / 12)
pub fn seasonal_factor(date: NaiveDate) -> f64 {
    (2.0 * PI * date.month() as f64 / 12.0).sin()
}

pub fn extract_seasonal_features(date: NaiveDate) -> SeasonalFeatures {
    let month = date.month() as f64;
    let day = date.day() as f64;
    let season = ((date.month() % 12 + 3) / 3) as f64 / 4.0;
    SeasonalFeatures {
        day_of_year: date.ordinal() as f64 / 365.0,
        month: month / 12.0,
        season,
        month_sin: (2.0 * PI * month / 12.0).sin(),
        month_cos: (2.0 * PI * month / 12.0).cos(),
        day_sin: (2.0 * PI * day / 31.0).sin(),
        day_cos: (2.0 * PI * day / 31.0).cos(),
    }
}

/// Mean of each weather field across the window, in [`WEATHER_FEATURES`] order.
///
/// Each field is averaged over the observations that report it, after
/// dropping readings more than three sample standard deviations from that
/// field's mean. A field no observation reports is 0.
pub fn aggregate_weather(window: &[WeatherObservation]) -> CoreResult<[f64; 6]> {
    let mut columns: [Vec<f64>; 6] = Default::default();
    for obs in window {
        let fields = [
            obs.temperature_celsius,
            obs.humidity_percent,
            obs.rainfall_mm,
            obs.wind_speed_mps,
            obs.soil_moisture,
            obs.heat_index(),
        ];
        for ((name, column), value) in WEATHER_FEATURES.iter().zip(columns.iter_mut()).zip(fields) {
            if let Some(v) = value {
                validate_finite(name, v)?;
                column.push(v);
            }
        }
    }

    let mut means = [0.0; 6];
    for (slot, column) in means.iter_mut().zip(columns.iter()) {
        *slot = stats::mean(&without_outliers(column)).unwrap_or(0.0);
    }
    Ok(means)
}

const OUTLIER_SIGMAS: f64 = 3.0;

fn without_outliers(values: &[f64]) -> Vec<f64> {
    let (Some(mean), Some(std)) = (stats::mean(values), stats::sample_std(values)) else {
        return values.to_vec();
    };
    values
        .iter()
        .copied()
        .filter(|v| (v - mean).abs() <= OUTLIER_SIGMAS * std)
        .collect()
}

/// Build the crop suitability feature vector.
pub fn build_crop_features(
    weather: &[WeatherObservation],
    soil: &SoilProfile,
    market: &MarketSnapshot,
    date: NaiveDate,
) -> CoreResult<FeatureVector> {
    validate_farm_size(soil.farm_area)?;
    validate_finite("current_price", market.current_price)?;
    validate_finite("demand_index", market.demand_index)?;
    validate_finite("supply_index", market.supply_index)?;
    if market.price_history.iter().any(|p| !p.is_finite()) {
        return Err(CoreError::validation("price_history", "prices must be finite"));
    }

    let seasonal = extract_seasonal_features(date);
    let mut values = Vec::with_capacity(CROP_FEATURE_DIM);
    values.extend_from_slice(&aggregate_weather(weather)?);
    values.push(soil.farm_area);
    values.extend_from_slice(&soil.soil_type.one_hot());
    values.extend_from_slice(&[
        market.current_price,
        market.demand_index,
        market.supply_index,
        market.market_trend(),
        seasonal_factor(date),
    ]);
    values.extend_from_slice(&[
        seasonal.day_of_year,
        seasonal.month,
        seasonal.season,
        seasonal.month_cos,
        seasonal.day_sin,
        seasonal.day_cos,
    ]);

    debug_assert_eq!(values.len(), CROP_FEATURE_DIM);
    Ok(FeatureVector { values })
}

/// Build the price feature matrix from a chronological price history.
///
/// Rolling windows longer than the history fall back to the whole history so
/// that no row is dropped and no value is NaN.
pub fn build_price_features(
    historical_prices: &[f64],
    market: &MarketSnapshot,
) -> CoreResult<FeatureMatrix> {
    validate_price_series("historical_prices", historical_prices)?;
    validate_finite("demand_index", market.demand_index)?;
    validate_finite("supply_index", market.supply_index)?;

    let ma_short = rolling_bfill(historical_prices, SHORT_WINDOW, |w| stats::mean(w).unwrap_or(0.0));
    let ma_long = rolling_bfill(historical_prices, LONG_WINDOW, |w| stats::mean(w).unwrap_or(0.0));
    let volatility = rolling_bfill(historical_prices, VOLATILITY_WINDOW, |w| {
        stats::sample_std(w).unwrap_or(0.0)
    });

    let rows = historical_prices
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            let momentum = if i >= MOMENTUM_LAG {
                price - historical_prices[i - MOMENTUM_LAG]
            } else {
                0.0
            };
            vec![
                price,
                ma_short[i],
                ma_long[i],
                momentum,
                volatility[i],
                market.demand_index,
                market.supply_index,
            ]
        })
        .collect();

    Ok(FeatureMatrix { rows })
}

/// Supervised pairs for a price regressor: features at period t, price at t + 1
pub fn price_training_set(
    historical_prices: &[f64],
    market: &MarketSnapshot,
) -> CoreResult<(Vec<Vec<f64>>, Vec<f64>)> {
    if historical_prices.len() < 2 {
        return Err(CoreError::validation(
            "historical_prices",
            "at least two prices are required to train a price model",
        ));
    }
    let matrix = build_price_features(historical_prices, market)?;
    let mut x = matrix.rows;
    x.pop();
    let y = historical_prices[1..].to_vec();
    Ok((x, y))
}

/// Trailing-window statistic, backward-filled over the first `window - 1` rows
fn rolling_bfill(values: &[f64], window: usize, stat: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let n = values.len();
    if n < window {
        return vec![stat(values); n];
    }
    let mut out = vec![0.0; n];
    for i in (window - 1)..n {
        out[i] = stat(&values[i + 1 - window..=i]);
    }
    let first = out[window - 1];
    for slot in out.iter_mut().take(window - 1) {
        *slot = first;
    }
    out
}
