//! HTTP request handlers

pub mod crops;
pub mod health;
pub mod recommendation;

pub use crops::*;
pub use health::*;
pub use recommendation::*;
