//! Error handling for the crop advisor API
//!
//! Engine errors are mapped onto HTTP statuses with a consistent JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::CoreError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Engine errors
    #[error(transparent)]
    Core(#[from] CoreError),

    // Request validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Core(core) => core_status_and_detail(core),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", msg.clone()),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone()),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred"),
            ),
        }
    }
}

fn core_status_and_detail(error: &CoreError) -> (StatusCode, ErrorDetail) {
    match error {
        CoreError::Validation { field, message } => (
            StatusCode::BAD_REQUEST,
            ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: message.clone(),
                field: Some(field.clone()),
            },
        ),
        CoreError::InvalidSoilType(soil) => (
            StatusCode::BAD_REQUEST,
            ErrorDetail {
                code: "INVALID_SOIL_TYPE".to_string(),
                message: format!("Unrecognised soil type '{}'", soil),
                field: Some("soil_type".to_string()),
            },
        ),
        CoreError::NotFound(resource) => (
            StatusCode::NOT_FOUND,
            ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
        ),
        CoreError::AlreadyExists(resource) => (
            StatusCode::CONFLICT,
            ErrorDetail::new("ALREADY_EXISTS", format!("{} already exists", resource)),
        ),
        CoreError::NotFitted(model) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorDetail::new("MODEL_NOT_FITTED", format!("{} has not been trained", model)),
        ),
        CoreError::DataUnavailable(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorDetail::new("DATA_UNAVAILABLE", msg.clone()),
        ),
        CoreError::Computation(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorDetail::new("COMPUTATION_ERROR", msg.clone()),
        ),
        CoreError::Storage(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorDetail::new("STORAGE_ERROR", format!("Storage error: {}", msg)),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status(error: AppError) -> StatusCode {
        error.status_and_detail().0
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(CoreError::validation("farm_size", "bad").into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(CoreError::InvalidSoilType("peat".into()).into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(CoreError::NotFound("crop".into()).into()), StatusCode::NOT_FOUND);
        assert_eq!(status(CoreError::AlreadyExists("crop".into()).into()), StatusCode::CONFLICT);
        assert_eq!(status(CoreError::NotFitted("m".into()).into()), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status(CoreError::Computation("x".into()).into()), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status(CoreError::Storage("disk".into()).into()), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status(AppError::Internal("boom".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_detail_carries_field() {
        let (_, detail) = AppError::from(CoreError::validation("farm_size", "must be greater than 0"))
            .status_and_detail();
        assert_eq!(detail.code, "VALIDATION_ERROR");
        assert_eq!(detail.field.as_deref(), Some("farm_size"));
    }
}
