//! Crop recommendation engine
//!
//! Turns weather, soil and market observations into a ranked list of crops by
//! projected, risk-adjusted profit. Everything in this crate is synchronous and
//! free of I/O so it can be shared between the backend and the WASM client.

pub mod cache;
pub mod error;
pub mod features;
pub mod forecast;
pub mod learning;
pub mod models;
pub mod profitability;
pub mod providers;
pub mod recommendation;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
