use std::collections::BTreeMap;

use super::model::TrainedModel;
use super::ridge::RidgeRegressor;
use super::scorer::TrainableScorer;
use crate::error::{CoreError, CoreResult};
use crate::features::{price_training_set, FeatureMatrix, PRICE_COLUMN, PRICE_FEATURE_DIM, PRICE_FEATURE_NAMES};
use crate::models::{MarketSnapshot, PriceForecast};
use crate::stats;

/// Independently trained price regressors keyed by crop name (lowercase)
#[derive(Debug, Clone)]
pub struct PriceModels<R = RidgeRegressor> {
    models: BTreeMap<String, TrainedModel<R>>,
}

impl<R> Default for PriceModels<R> {
    fn default() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }
}

fn key(crop: &str) -> String {
    crop.trim().to_lowercase()
}

impl<R: TrainableScorer<Target = f64> + Default> PriceModels<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit a regressor and scaler for one crop, replacing any previous pair
    pub fn train(&mut self, crop: &str, x: &[Vec<f64>], y: &[f64]) -> CoreResult<()> {
        let model = TrainedModel::fit(R::default(), x, y)?;
        tracing::info!(crop = %crop, samples = x.len(), "Price model trained");
        self.models.insert(key(crop), model);
        Ok(())
    }

    /// Train on next-period prices derived from a chronological history
    pub fn train_from_history(
        &mut self,
        crop: &str,
        prices: &[f64],
        market: &MarketSnapshot,
    ) -> CoreResult<()> {
        let (x, y) = price_training_set(prices, market)?;
        self.train(crop, &x, &y)
    }

    pub fn is_trained(&self, crop: &str) -> bool {
        self.models.contains_key(&key(crop))
    }

    pub fn trained_crops(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    pub fn model(&self, crop: &str) -> Option<&TrainedModel<R>> {
        self.models.get(&key(crop))
    }

    fn require(&self, crop: &str) -> CoreResult<&TrainedModel<R>> {
        self.model(crop)
            .ok_or_else(|| CoreError::NotFitted(format!("price model for {}", crop)))
    }

    /// Normalised weight of each price feature for one crop, in
    /// [`PRICE_FEATURE_NAMES`] order
    pub fn feature_importance(&self, crop: &str) -> CoreResult<Vec<(&'static str, f64)>> {
        let model = self.require(crop)?;
        if model.n_features() != PRICE_FEATURE_DIM {
            return Err(CoreError::validation(
                "features",
                format!(
                    "price model for {} was trained on {} features, expected {}",
                    crop,
                    model.n_features(),
                    PRICE_FEATURE_DIM
                ),
            ));
        }
        Ok(PRICE_FEATURE_NAMES
            .iter()
            .copied()
            .zip(model.feature_importance()?)
            .collect())
    }

    /// Roll the crop's regressor forward `periods` steps from the last row.
    ///
    /// Each prediction replaces the price column of the next input row. The
    /// confidence is the R² of one-step predictions over the supplied history.
    pub fn predict_future_price(
        &self,
        crop: &str,
        features: &FeatureMatrix,
        periods: usize,
    ) -> CoreResult<PriceForecast> {
        let model = self.require(crop)?;
        let last = features
            .last_row()
            .ok_or_else(|| CoreError::validation("features", "price feature matrix is empty"))?;

        let confidence = if features.len() >= 2 {
            let rows = features.rows();
            let predicted = model.predict(&rows[..rows.len() - 1])?;
            let truth = features.column(PRICE_COLUMN);
            stats::r_squared(&truth[1..], &predicted)
        } else {
            0.0
        };

        let mut row = last.to_vec();
        let mut prices = Vec::with_capacity(periods);
        for _ in 0..periods {
            let next = model
                .predict(std::slice::from_ref(&row))?
                .into_iter()
                .next()
                .ok_or_else(|| CoreError::Computation("regressor returned no prediction".to_string()))?;
            if !next.is_finite() {
                return Err(CoreError::Computation(format!("price forecast for {} diverged", crop)));
            }
            prices.push(next);
            row[PRICE_COLUMN] = next;
        }

        Ok(PriceForecast { prices, confidence })
    }
}
