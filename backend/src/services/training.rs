//! Model bootstrap from local data files

use std::path::Path;

use shared::features::CROP_FEATURE_NAMES;
use shared::learning::{PriceModels, SuitabilityModel};
use shared::{CoreError, MarketSnapshot};

use crate::error::{AppError, AppResult};
use crate::external::CsvMarketProvider;

const LABEL_COLUMN: &str = "crop";

/// Train one price model per crop from its full history.
///
/// Crops with fewer than two records, or whose training fails, are left
/// untrained and logged.
pub fn train_price_models(
    market: &CsvMarketProvider,
    crops: &[String],
    region: Option<&str>,
) -> PriceModels {
    let mut models: PriceModels = PriceModels::new();
    for crop in crops {
        let history = market.history_for(crop, region);
        if history.len() < 2 {
            tracing::warn!(crop = %crop, records = history.len(), "Not enough history to train price model");
            continue;
        }
        let Some(snapshot) = MarketSnapshot::from_records(&history) else {
            continue;
        };
        if let Err(e) = models.train_from_history(crop, &snapshot.price_history, &snapshot) {
            tracing::warn!(crop = %crop, error = %e, "Price model training failed");
        }
    }
    tracing::info!(trained = models.trained_crops().len(), "Price models ready");
    models
}

/// Read a labelled suitability training set.
///
/// The header must list every crop feature in order followed by `crop`.
pub fn load_training_set(path: impl AsRef<Path>) -> AppResult<(Vec<Vec<f64>>, Vec<String>)> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AppError::Configuration(format!("cannot open {}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::Configuration(format!("{}: {}", path.display(), e)))?
        .clone();
    let expected: Vec<&str> = CROP_FEATURE_NAMES
        .iter()
        .copied()
        .chain(std::iter::once(LABEL_COLUMN))
        .collect();
    if headers.iter().collect::<Vec<_>>() != expected {
        return Err(CoreError::validation(
            "training_data",
            format!("header must be: {}", expected.join(",")),
        )
        .into());
    }

    let mut x = Vec::new();
    let mut y = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| AppError::Configuration(format!("{} row {}: {}", path.display(), i + 1, e)))?;
        let mut row = Vec::with_capacity(CROP_FEATURE_NAMES.len());
        for (name, field) in CROP_FEATURE_NAMES.iter().zip(record.iter()) {
            let value: f64 = field.parse().map_err(|_| {
                CoreError::validation(*name, format!("row {}: '{}' is not a number", i + 1, field))
            })?;
            row.push(value);
        }
        let label = record.get(CROP_FEATURE_NAMES.len()).unwrap_or_default().to_string();
        if label.is_empty() {
            return Err(CoreError::validation(LABEL_COLUMN, format!("row {} has no label", i + 1)).into());
        }
        x.push(row);
        y.push(label);
    }
    Ok((x, y))
}

/// Train the suitability classifier from a labelled CSV
pub fn train_suitability_model(path: impl AsRef<Path>) -> AppResult<SuitabilityModel> {
    let (x, y) = load_training_set(path)?;
    let mut model: SuitabilityModel = SuitabilityModel::new();
    model.train(&x, &y)?;
    Ok(model)
}
