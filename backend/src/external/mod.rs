//! File-backed data providers
//!
//! Each provider implements one of the engine's provider capabilities over a
//! local data file.

pub mod market;
pub mod soil;
pub mod weather;

pub use market::CsvMarketProvider;
pub use soil::JsonSoilProvider;
pub use weather::JsonWeatherProvider;
