//! Learning layer
//!
//! Concrete algorithms sit behind [`TrainableScorer`]; the models that the
//! orchestrator talks to only ever hold a scorer together with the scaler it
//! was fitted with, as a [`TrainedModel`].

mod logistic;
mod model;
mod price;
mod ridge;
mod scaler;
mod scorer;
mod suitability;

pub use logistic::LogisticClassifier;
pub use model::TrainedModel;
pub use price::PriceModels;
pub use ridge::RidgeRegressor;
pub use scaler::StandardScaler;
pub use scorer::{Classifier, TrainableScorer};
pub use suitability::{ModelState, SuitabilityModel};
