//! Market price models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats;

/// One dated price observation for a commodity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub commodity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Price per ton
    pub price: f64,
    #[serde(default)]
    pub demand_index: f64,
    #[serde(default)]
    pub supply_index: f64,
}

/// Current market state for one commodity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketSnapshot {
    pub current_price: f64,
    pub demand_index: f64,
    pub supply_index: f64,
    /// Past prices, oldest first
    #[serde(default)]
    pub price_history: Vec<f64>,
}

impl MarketSnapshot {
    /// Build a snapshot from price records. The latest record supplies the
    /// current price and indices. Returns `None` for an empty series.
    pub fn from_records(records: &[PriceRecord]) -> Option<Self> {
        let sorted = chronological(records);
        let latest = sorted.last()?;
        Some(Self {
            current_price: latest.price,
            demand_index: latest.demand_index,
            supply_index: latest.supply_index,
            price_history: sorted.iter().map(|r| r.price).collect(),
        })
    }

    /// Slope of a linear fit over the price history, squashed to [-1, 1].
    /// Zero with fewer than two prices.
    pub fn market_trend(&self) -> f64 {
        stats::linear_slope(&self.price_history)
            .map(f64::tanh)
            .unwrap_or(0.0)
    }
}

/// Descriptive statistics over a commodity's price history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketAnalysis {
    pub current_price: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_volatility: f64,
    pub price_trend: f64,
    /// Mean price per calendar month (1-12)
    pub seasonal_patterns: BTreeMap<u32, f64>,
}

impl MarketAnalysis {
    pub fn from_records(records: &[PriceRecord]) -> Option<Self> {
        let sorted = chronological(records);
        let latest = sorted.last()?;
        let prices: Vec<f64> = sorted.iter().map(|r| r.price).collect();

        let mut by_month: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for record in &sorted {
            let entry = by_month.entry(record.date.month()).or_insert((0.0, 0));
            entry.0 += record.price;
            entry.1 += 1;
        }

        Some(Self {
            current_price: latest.price,
            avg_price: stats::mean(&prices).unwrap_or(0.0),
            min_price: prices.iter().copied().fold(f64::INFINITY, f64::min),
            max_price: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            price_volatility: stats::sample_std(&prices).unwrap_or(0.0),
            price_trend: stats::linear_slope(&prices).unwrap_or(0.0),
            seasonal_patterns: by_month
                .into_iter()
                .map(|(month, (sum, count))| (month, sum / count as f64))
                .collect(),
        })
    }
}

/// Records sorted oldest first; ties keep their input order
fn chronological(records: &[PriceRecord]) -> Vec<&PriceRecord> {
    let mut sorted: Vec<&PriceRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);
    sorted
}
