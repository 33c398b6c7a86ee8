//! Services backing the HTTP layer

pub mod crop_store;
pub mod training;

pub use crop_store::JsonFileCropStore;
pub use training::{load_training_set, train_price_models, train_suitability_model};
