use ndarray::{Array2, ArrayView2};

use crate::error::{CoreError, CoreResult};

/// A learning algorithm that can be fitted and queried.
///
/// Inputs are already scaled; scaling is owned by
/// [`TrainedModel`](super::TrainedModel).
pub trait TrainableScorer: Send + Sync {
    type Target: Clone;

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[Self::Target]) -> CoreResult<()>;

    fn predict(&self, x: ArrayView2<'_, f64>) -> CoreResult<Vec<Self::Target>>;

    /// Per-class probabilities, one row per input row.
    fn predict_proba(&self, _x: ArrayView2<'_, f64>) -> CoreResult<Array2<f64>> {
        Err(CoreError::Computation(
            "scorer does not produce class probabilities".to_string(),
        ))
    }

    /// Unnormalised weight magnitude of each input column
    fn feature_weights(&self) -> CoreResult<Vec<f64>>;
}

/// A scorer over string labels with a native class order
pub trait Classifier: TrainableScorer<Target = String> {
    /// Class labels in the column order of `predict_proba`
    fn classes(&self) -> &[String];
}
