//! Error taxonomy for the recommendation engine

use thiserror::Error;

/// Errors produced by the recommendation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    // Validation errors
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid soil type: {0}")]
    InvalidSoilType(String),

    // Model lifecycle errors
    #[error("Model not fitted: {0}")]
    NotFitted(String),

    // Data errors
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Computation error: {0}")]
    Computation(String),

    // Store errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result alias used across the engine
pub type CoreResult<T> = Result<T, CoreError>;
