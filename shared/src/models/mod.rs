//! Domain models for the crop recommendation engine

mod crop;
mod market;
mod profitability;
mod recommendation;
mod soil;
mod weather;

pub use crop::*;
pub use market::*;
pub use profitability::*;
pub use recommendation::*;
pub use soil::*;
pub use weather::*;
