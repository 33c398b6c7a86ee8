use super::logistic::LogisticClassifier;
use super::model::TrainedModel;
use super::scorer::Classifier;
use crate::error::{CoreError, CoreResult};
use crate::features::{CROP_FEATURE_DIM, CROP_FEATURE_NAMES};

/// Lifecycle of a trainable model
#[derive(Debug, Clone)]
pub enum ModelState<M> {
    Untrained,
    Trained(M),
}

/// Crop suitability classifier over crop feature vectors
#[derive(Debug, Clone)]
pub struct SuitabilityModel<C = LogisticClassifier> {
    state: ModelState<TrainedModel<C>>,
}

impl<C> Default for SuitabilityModel<C> {
    fn default() -> Self {
        Self {
            state: ModelState::Untrained,
        }
    }
}

impl<C: Classifier + Default> SuitabilityModel<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, ModelState::Trained(_))
    }

    pub fn state(&self) -> &ModelState<TrainedModel<C>> {
        &self.state
    }

    /// Fit scaler and classifier together. Replaces any previous fit; on
    /// error the previous state is kept.
    pub fn train(&mut self, x: &[Vec<f64>], y: &[String]) -> CoreResult<()> {
        let model = TrainedModel::fit(C::default(), x, y)?;
        tracing::info!(
            samples = x.len(),
            classes = model.scorer().classes().len(),
            "Suitability model trained"
        );
        self.state = ModelState::Trained(model);
        Ok(())
    }

    fn trained(&self) -> CoreResult<&TrainedModel<C>> {
        match &self.state {
            ModelState::Trained(model) => Ok(model),
            ModelState::Untrained => Err(CoreError::NotFitted("suitability model".to_string())),
        }
    }

    /// Crop labels in native class order
    pub fn classes(&self) -> CoreResult<&[String]> {
        Ok(self.trained()?.scorer().classes())
    }

    fn probabilities(&self, features: &[f64]) -> CoreResult<(&TrainedModel<C>, Vec<f64>)> {
        let model = self.trained()?;
        let proba = model.predict_proba(&[features.to_vec()])?;
        if proba.nrows() == 0 {
            return Err(CoreError::Computation("classifier returned no probabilities".to_string()));
        }
        Ok((model, proba.row(0).to_vec()))
    }

    /// The `n` most probable crops, highest first. Ties keep class order.
    pub fn predict_best_crops(&self, features: &[f64], n: usize) -> CoreResult<Vec<String>> {
        let (model, proba) = self.probabilities(features)?;
        let classes = model.scorer().classes();
        Ok(rank_descending(&proba)
            .into_iter()
            .take(n)
            .map(|i| classes[i].clone())
            .collect())
    }

    /// Normalised weight of each crop feature, in [`CROP_FEATURE_NAMES`] order
    pub fn feature_importance(&self) -> CoreResult<Vec<(&'static str, f64)>> {
        let model = self.trained()?;
        if model.n_features() != CROP_FEATURE_DIM {
            return Err(CoreError::validation(
                "features",
                format!(
                    "model was trained on {} features, expected {}",
                    model.n_features(),
                    CROP_FEATURE_DIM
                ),
            ));
        }
        Ok(CROP_FEATURE_NAMES
            .iter()
            .copied()
            .zip(model.feature_importance()?)
            .collect())
    }

    /// Probability of `crop` for these features; 0 when the model never saw it
    pub fn suitability_score(&self, crop: &str, features: &[f64]) -> CoreResult<f64> {
        let (model, proba) = self.probabilities(features)?;
        Ok(model
            .scorer()
            .classes()
            .iter()
            .position(|c| c.eq_ignore_ascii_case(crop))
            .map(|i| proba[i])
            .unwrap_or(0.0))
    }
}

/// Indices of `scores` from highest to lowest; the sort is stable so equal
/// scores keep their index order
fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_untrained_model_is_not_fitted() {
        let model: SuitabilityModel = SuitabilityModel::new();
        assert!(!model.is_trained());
        let err = model.predict_best_crops(&[0.0; 8], 2).unwrap_err();
        assert!(matches!(err, CoreError::NotFitted(_)));
        assert!(matches!(model.suitability_score("rice", &[0.0; 8]), Err(CoreError::NotFitted(_))));
    }

    #[test]
    fn test_two_sample_training() {
        let x = vec![
            vec![30.0, 80.0, 200.0, 2.0, 0.4, 33.0, 1.0, 0.0],
            vec![18.0, 45.0, 50.0, 4.0, 0.2, 17.0, 0.0, 1.0],
        ];
        let mut model: SuitabilityModel = SuitabilityModel::new();
        model.train(&x, &labels(&["rice", "wheat"])).unwrap();
        assert!(model.is_trained());

        let best = model.predict_best_crops(&x[0], 2).unwrap();
        assert_eq!(best.len(), 2);
        assert!(best.iter().all(|c| c == "rice" || c == "wheat"));
        assert_eq!(best[0], "rice");
        assert_eq!(model.predict_best_crops(&x[1], 1).unwrap(), labels(&["wheat"]));
    }

    #[test]
    fn test_ties_keep_class_order() {
        assert_eq!(rank_descending(&[0.2, 0.4, 0.4]), vec![1, 2, 0]);
        assert_eq!(rank_descending(&[0.5, 0.5]), vec![0, 1]);
        assert!(rank_descending(&[]).is_empty());
    }

    #[test]
    fn test_classes_are_sorted() {
        let x = vec![vec![0.0], vec![5.0], vec![10.0]];
        let mut model: SuitabilityModel = SuitabilityModel::new();
        model.train(&x, &labels(&["wheat", "maize", "rice"])).unwrap();
        assert_eq!(model.classes().unwrap(), &labels(&["maize", "rice", "wheat"])[..]);
        assert_eq!(model.predict_best_crops(&[5.0], 3).unwrap().len(), 3);
    }

    #[test]
    fn test_suitability_score() {
        let x = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
        let mut model: SuitabilityModel = SuitabilityModel::new();
        model.train(&x, &labels(&["rice", "rice", "wheat", "wheat"])).unwrap();

        let rice = model.suitability_score("rice", &[0.05]).unwrap();
        let wheat = model.suitability_score("Wheat", &[0.05]).unwrap();
        assert!(rice > wheat);
        assert_relative_eq!(rice + wheat, 1.0, epsilon = 1e-9);
        assert_eq!(model.suitability_score("cassava", &[0.05]).unwrap(), 0.0);
    }

    #[test]
    fn test_wrong_width_is_a_validation_error() {
        let mut model: SuitabilityModel = SuitabilityModel::new();
        model.train(&[vec![1.0, 2.0], vec![2.0, 1.0]], &labels(&["a", "b"])).unwrap();
        let err = model.predict_best_crops(&[1.0, 2.0, 3.0], 1).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn test_feature_importance_names_crop_features() {
        let mut low = vec![1.0; CROP_FEATURE_DIM];
        let mut high = low.clone();
        low[12] = 100.0;
        high[12] = 900.0;
        let x = vec![low.clone(), low, high.clone(), high];
        let mut model: SuitabilityModel = SuitabilityModel::new();
        assert!(matches!(model.feature_importance(), Err(CoreError::NotFitted(_))));
        model.train(&x, &labels(&["rice", "rice", "wheat", "wheat"])).unwrap();

        let importance = model.feature_importance().unwrap();
        assert_eq!(importance.len(), CROP_FEATURE_DIM);
        assert_eq!(importance[12].0, CROP_FEATURE_NAMES[12]);
        let (top, _) = importance
            .iter()
            .copied()
            .fold(("", f64::MIN), |best, item| if item.1 > best.1 { item } else { best });
        assert_eq!(top, "current_price");
        assert_relative_eq!(importance.iter().map(|(_, w)| w).sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_feature_importance_needs_crop_width() {
        let mut model: SuitabilityModel = SuitabilityModel::new();
        model.train(&[vec![1.0, 2.0], vec![2.0, 1.0]], &labels(&["a", "b"])).unwrap();
        assert!(matches!(model.feature_importance(), Err(CoreError::Validation { .. })));
    }

    #[test]
    fn test_failed_retrain_keeps_previous_state() {
        let mut model: SuitabilityModel = SuitabilityModel::new();
        model.train(&[vec![1.0], vec![2.0]], &labels(&["a", "b"])).unwrap();
        assert!(model.train(&[], &[]).is_err());
        assert!(model.is_trained());
    }
}
