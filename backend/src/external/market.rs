//! Market price history from a CSV export
//!
//! Expected columns: `date,crop,region,price,demand_index,supply_index`.
//! `region`, `demand_index` and `supply_index` may be empty.

use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use shared::providers::MarketProvider;
use shared::{DateRange, PriceRecord};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct MarketRow {
    date: NaiveDate,
    crop: String,
    #[serde(default)]
    region: Option<String>,
    price: f64,
    #[serde(default)]
    demand_index: Option<f64>,
    #[serde(default)]
    supply_index: Option<f64>,
}

impl MarketRow {
    fn into_record(self) -> PriceRecord {
        PriceRecord {
            date: self.date,
            commodity: self.crop.trim().to_string(),
            region: self
                .region
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            price: self.price,
            demand_index: self.demand_index.unwrap_or(0.0),
            supply_index: self.supply_index.unwrap_or(0.0),
        }
    }
}

/// In-memory price history loaded once from CSV
#[derive(Debug, Clone, Default)]
pub struct CsvMarketProvider {
    records: Vec<PriceRecord>,
}

impl CsvMarketProvider {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::Configuration(format!("cannot open market history {}: {}", path.display(), e))
        })?;
        let provider = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            records = provider.records.len(),
            "Market history loaded"
        );
        Ok(provider)
    }

    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();
        for (i, row) in csv_reader.deserialize::<MarketRow>().enumerate() {
            let row = row.map_err(|e| {
                AppError::Configuration(format!("market history row {}: {}", i + 1, e))
            })?;
            if !row.price.is_finite() || row.price < 0.0 {
                return Err(AppError::Configuration(format!(
                    "market history row {}: price must be finite and non-negative",
                    i + 1
                )));
            }
            records.push(row.into_record());
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// All records for a commodity, optionally limited to a region, oldest first
    pub fn history_for(&self, commodity: &str, region: Option<&str>) -> Vec<PriceRecord> {
        let mut matching: Vec<PriceRecord> = self
            .records
            .iter()
            .filter(|r| r.commodity.eq_ignore_ascii_case(commodity.trim()))
            .filter(|r| region_matches(r, region))
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.date);
        matching
    }
}

/// Records without a region apply to every region
fn region_matches(record: &PriceRecord, region: Option<&str>) -> bool {
    match (record.region.as_deref(), region) {
        (Some(own), Some(wanted)) => own.eq_ignore_ascii_case(wanted.trim()),
        _ => true,
    }
}

impl MarketProvider for CsvMarketProvider {
    fn market_history(&self, region: &str, commodity: &str, range: &DateRange) -> Vec<PriceRecord> {
        let history: Vec<PriceRecord> = self
            .history_for(commodity, Some(region))
            .into_iter()
            .filter(|r| range.contains(r.date))
            .collect();
        tracing::debug!(
            commodity = %commodity,
            region = %region,
            records = history.len(),
            "Market history queried"
        );
        history
    }
}
