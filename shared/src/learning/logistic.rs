use linfa::prelude::*;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2, ArrayView2};
use std::collections::BTreeSet;

use super::scorer::{Classifier, TrainableScorer};
use crate::error::{CoreError, CoreResult};

const DEFAULT_ALPHA: f64 = 1.0;
const MAX_ITERATIONS: u64 = 200;

/// Multinomial logistic regression over crop labels.
///
/// Labels are encoded as indices into the lexicographically sorted class
/// list, which is also the column order of `predict_proba` and the tie order
/// of `predict`.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    alpha: f64,
    classes: Vec<String>,
    fitted: Option<FittedClasses>,
}

#[derive(Debug, Clone)]
struct FittedClasses {
    model: MultiFittedLogisticRegression<f64, usize>,
    /// Output column of the fitted model for each entry of `classes`
    columns: Vec<usize>,
    n_features: usize,
}

impl Default for LogisticClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl LogisticClassifier {
    /// `alpha` is the L2 penalty
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            classes: Vec::new(),
            fitted: None,
        }
    }

    fn fitted(&self) -> CoreResult<&FittedClasses> {
        self.fitted
            .as_ref()
            .ok_or_else(|| CoreError::NotFitted("logistic classifier".to_string()))
    }
}

impl TrainableScorer for LogisticClassifier {
    type Target = String;

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[String]) -> CoreResult<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(CoreError::validation("alpha", "must be finite and non-negative"));
        }
        if x.nrows() != y.len() {
            return Err(CoreError::validation(
                "y",
                format!("{} labels for {} rows", y.len(), x.nrows()),
            ));
        }

        let classes: Vec<String> = y.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        if classes.len() < 2 {
            return Err(CoreError::validation("y", "at least two distinct labels are required"));
        }
        let targets: Array1<usize> = y
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();

        let dataset = Dataset::new(x.to_owned(), targets);
        let model = MultiLogisticRegression::default()
            .alpha(self.alpha)
            .max_iterations(MAX_ITERATIONS)
            .fit(&dataset)
            .map_err(|e| CoreError::Computation(format!("logistic regression failed: {}", e)))?;

        let columns = (0..classes.len())
            .map(|class| {
                model
                    .classes()
                    .iter()
                    .position(|c| *c == class)
                    .ok_or_else(|| CoreError::Computation(format!("class {} missing from fit", classes[class])))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        self.classes = classes;
        self.fitted = Some(FittedClasses {
            model,
            columns,
            n_features: x.ncols(),
        });
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> CoreResult<Vec<String>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .fold(0, |best, (i, p)| if *p > row[best] { i } else { best });
                self.classes[best].clone()
            })
            .collect())
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> CoreResult<Array2<f64>> {
        let fitted = self.fitted()?;
        if x.ncols() != fitted.n_features {
            return Err(CoreError::validation(
                "features",
                format!("expected {} features, got {}", fitted.n_features, x.ncols()),
            ));
        }
        let raw = fitted.model.predict_probabilities(&x.to_owned());
        Ok(Array2::from_shape_fn((raw.nrows(), fitted.columns.len()), |(r, c)| {
            raw[[r, fitted.columns[c]]]
        }))
    }

    /// Mean absolute coefficient across classes
    fn feature_weights(&self) -> CoreResult<Vec<f64>> {
        let fitted = self.fitted()?;
        Ok(fitted
            .model
            .params()
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|w| w.abs()).sum::<f64>() / row.len().max(1) as f64)
            .collect())
    }
}

impl Classifier for LogisticClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }
}
