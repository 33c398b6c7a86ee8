use linfa::prelude::*;
use linfa_elasticnet::ElasticNet;
use ndarray::{Array1, ArrayView1, ArrayView2};

use super::scorer::TrainableScorer;
use crate::error::{CoreError, CoreResult};
use crate::stats;

const DEFAULT_PENALTY: f64 = 1e-3;
const TOLERANCE: f64 = 1e-8;
const MAX_ITERATIONS: u32 = 10_000;

/// L2-regularised least squares with an unpenalised intercept.
///
/// Backed by an elastic net with no L1 share; `penalty` weights the L2 term
/// against the mean squared error.
#[derive(Debug, Clone)]
pub struct RidgeRegressor {
    penalty: f64,
    fitted: Option<ElasticNet<f64>>,
}

impl Default for RidgeRegressor {
    fn default() -> Self {
        Self::new(DEFAULT_PENALTY)
    }
}

impl RidgeRegressor {
    pub fn new(penalty: f64) -> Self {
        Self {
            penalty,
            fitted: None,
        }
    }

    fn fitted(&self) -> CoreResult<&ElasticNet<f64>> {
        self.fitted
            .as_ref()
            .ok_or_else(|| CoreError::NotFitted("ridge regressor".to_string()))
    }

    pub fn coefficients(&self) -> CoreResult<ArrayView1<'_, f64>> {
        Ok(self.fitted()?.hyperplane().view())
    }

    pub fn intercept(&self) -> CoreResult<f64> {
        Ok(self.fitted()?.intercept())
    }

    /// R² of the predictions on `x` against `y`
    pub fn score(&self, x: ArrayView2<'_, f64>, y: &[f64]) -> CoreResult<f64> {
        let predicted = self.predict(x)?;
        Ok(stats::r_squared(y, &predicted))
    }
}

impl TrainableScorer for RidgeRegressor {
    type Target = f64;

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[f64]) -> CoreResult<()> {
        if !self.penalty.is_finite() || self.penalty <= 0.0 {
            return Err(CoreError::validation("penalty", "must be finite and positive"));
        }
        if x.nrows() != y.len() {
            return Err(CoreError::validation(
                "y",
                format!("{} targets for {} rows", y.len(), x.nrows()),
            ));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::validation("y", "targets must be finite"));
        }

        let dataset = Dataset::new(x.to_owned(), Array1::from(y.to_vec()));
        let model = ElasticNet::params()
            .penalty(self.penalty)
            .l1_ratio(0.0)
            .tolerance(TOLERANCE)
            .max_iterations(MAX_ITERATIONS)
            .fit(&dataset)
            .map_err(|e| CoreError::Computation(format!("ridge regression failed: {}", e)))?;
        self.fitted = Some(model);
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> CoreResult<Vec<f64>> {
        let model = self.fitted()?;
        if x.ncols() != model.hyperplane().len() {
            return Err(CoreError::validation(
                "features",
                format!("expected {} features, got {}", model.hyperplane().len(), x.ncols()),
            ));
        }
        let predicted: Array1<f64> = model.predict(&x.to_owned());
        Ok(predicted.to_vec())
    }

    fn feature_weights(&self) -> CoreResult<Vec<f64>> {
        Ok(self.fitted()?.hyperplane().iter().map(|w| w.abs()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    #[test]
    fn test_recovers_linear_relation() {
        let x = Array2::from_shape_fn((20, 2), |(i, j)| if j == 0 { i as f64 } else { ((i * 7) % 5) as f64 });
        let y: Vec<f64> = x.rows().into_iter().map(|r| 3.0 + 2.0 * r[0] - 0.5 * r[1]).collect();
        let mut ridge = RidgeRegressor::new(1e-6);
        ridge.fit(x.view(), &y).unwrap();

        let coefficients = ridge.coefficients().unwrap();
        assert_relative_eq!(coefficients[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(coefficients[1], -0.5, epsilon = 1e-3);
        assert_relative_eq!(ridge.intercept().unwrap(), 3.0, epsilon = 1e-2);
        assert!(ridge.score(x.view(), &y).unwrap() > 0.999);
    }

    #[test]
    fn test_penalty_shrinks_coefficients() {
        let x = array![[-1.0], [0.0], [1.0]];
        let y = vec![-2.0, 0.0, 2.0];
        let mut light = RidgeRegressor::new(1e-6);
        light.fit(x.view(), &y).unwrap();
        let mut heavy = RidgeRegressor::new(1.0);
        heavy.fit(x.view(), &y).unwrap();

        let light_w = light.coefficients().unwrap()[0];
        let heavy_w = heavy.coefficients().unwrap()[0];
        assert_relative_eq!(light_w, 2.0, epsilon = 1e-3);
        assert!(heavy_w > 0.0 && heavy_w < light_w);
        assert_relative_eq!(heavy.intercept().unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_target_scores_zero() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = vec![5.0, 5.0, 5.0];
        let mut ridge = RidgeRegressor::default();
        ridge.fit(x.view(), &y).unwrap();
        assert_relative_eq!(ridge.predict(array![[10.0]].view()).unwrap()[0], 5.0, epsilon = 1e-9);
        assert_eq!(ridge.score(x.view(), &y).unwrap(), 0.0);
    }

    #[test]
    fn test_unfitted_and_bad_input() {
        let ridge = RidgeRegressor::default();
        assert!(matches!(ridge.predict(array![[1.0]].view()), Err(CoreError::NotFitted(_))));
        assert!(matches!(ridge.feature_weights(), Err(CoreError::NotFitted(_))));

        let mut ridge = RidgeRegressor::default();
        assert!(ridge.fit(array![[1.0], [2.0]].view(), &[1.0]).is_err());
        assert!(RidgeRegressor::new(0.0).fit(array![[1.0], [2.0]].view(), &[1.0, 2.0]).is_err());
        ridge.fit(array![[1.0], [2.0]].view(), &[1.0, 2.0]).unwrap();
        assert!(matches!(
            ridge.predict(array![[1.0, 2.0]].view()),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn test_proba_not_supported() {
        let mut ridge = RidgeRegressor::default();
        ridge.fit(array![[1.0], [2.0]].view(), &[1.0, 2.0]).unwrap();
        assert!(matches!(ridge.predict_proba(array![[1.0]].view()), Err(CoreError::Computation(_))));
    }
}
