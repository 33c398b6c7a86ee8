use chrono::{DateTime, Utc};
use ndarray::Array2;

use super::scaler::StandardScaler;
use super::scorer::TrainableScorer;
use crate::error::{CoreError, CoreResult};
use crate::validation::{validate_matrix, validate_row_width};

/// A scorer bundled with the scaler it was fitted with.
///
/// The only constructor fits both on the same data, so a scorer can never be
/// queried through another model's scaler.
#[derive(Debug, Clone)]
pub struct TrainedModel<S> {
    scorer: S,
    scaler: StandardScaler,
    trained_at: DateTime<Utc>,
    n_features: usize,
}

fn to_array(rows: &[Vec<f64>], width: usize) -> CoreResult<Array2<f64>> {
    Array2::from_shape_vec((rows.len(), width), rows.iter().flatten().copied().collect())
        .map_err(|e| CoreError::Computation(format!("feature matrix: {}", e)))
}

impl<S: TrainableScorer> TrainedModel<S> {
    pub fn fit(mut scorer: S, x: &[Vec<f64>], y: &[S::Target]) -> CoreResult<Self> {
        let n_features = validate_matrix("x", x)?;
        let x = to_array(x, n_features)?;
        let scaler = StandardScaler::fit(x.view())?;
        let scaled = scaler.transform(x.view())?;
        scorer.fit(scaled.view(), y)?;
        Ok(Self {
            scorer,
            scaler,
            trained_at: Utc::now(),
            n_features,
        })
    }

    fn scaled(&self, x: &[Vec<f64>]) -> CoreResult<Array2<f64>> {
        for row in x {
            validate_row_width("features", row, self.n_features)?;
        }
        let x = to_array(x, self.n_features)?;
        self.scaler.transform(x.view())
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> CoreResult<Vec<S::Target>> {
        let scaled = self.scaled(x)?;
        self.scorer.predict(scaled.view())
    }

    pub fn predict_proba(&self, x: &[Vec<f64>]) -> CoreResult<Array2<f64>> {
        let scaled = self.scaled(x)?;
        self.scorer.predict_proba(scaled.view())
    }

    /// Scorer weights normalised to sum to 1, in input column order.
    ///
    /// Weights are taken in the scaled space, so columns are comparable
    /// regardless of their units. All-zero weights give a uniform split.
    pub fn feature_importance(&self) -> CoreResult<Vec<f64>> {
        let weights = self.scorer.feature_weights()?;
        let total: f64 = weights.iter().sum();
        if total > 0.0 && total.is_finite() {
            Ok(weights.iter().map(|w| w / total).collect())
        } else {
            Ok(vec![1.0 / weights.len().max(1) as f64; weights.len()])
        }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
