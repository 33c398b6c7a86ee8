use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{CoreError, CoreResult};

/// Per-feature standardisation to zero mean and unit variance.
///
/// Uses the population standard deviation; a constant feature keeps a scale
/// of 1 so it maps to 0 instead of NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: ArrayView2<'_, f64>) -> CoreResult<Self> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| CoreError::validation("x", "cannot fit a scaler on zero rows"))?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 { s } else { 1.0 });
        Ok(Self { mean, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> CoreResult<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(CoreError::validation(
                "features",
                format!("expected {} features, got {}", self.n_features(), x.ncols()),
            ));
        }
        Ok((&x - &self.mean) / &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_fit_transform() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let scaled = scaler.transform(x.view()).unwrap();
        assert_relative_eq!(scaled[[0, 0]], -1.0);
        assert_relative_eq!(scaled[[1, 0]], 1.0);
        // constant column maps to zero
        assert_eq!(scaled[[0, 1]], 0.0);
        assert_eq!(scaled[[1, 1]], 0.0);
        assert_eq!(scaler.scale()[1], 1.0);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let scaler = StandardScaler::fit(array![[1.0, 2.0]].view()).unwrap();
        assert!(scaler.transform(array![[1.0]].view()).is_err());
        assert!(StandardScaler::fit(Array2::<f64>::zeros((0, 2)).view()).is_err());
    }
}
