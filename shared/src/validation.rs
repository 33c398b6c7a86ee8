//! Validation utilities for engine inputs
//!
//! The engine fails fast: malformed inputs are reported as
//! [`CoreError::Validation`] instead of being replaced by defaults.

use crate::error::{CoreError, CoreResult};

// ============================================================================
// Scalar Validations
// ============================================================================

/// Reject NaN and infinities
pub fn validate_finite(field: &str, value: f64) -> CoreResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::validation(field, "must be a finite number"))
    }
}

/// Validate a factor that must lie in [0, 1] (risk factors, quality dampers)
pub fn validate_unit_interval(field: &str, value: f64) -> CoreResult<()> {
    validate_finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::validation(field, "must be between 0 and 1"));
    }
    Ok(())
}

/// Clamp a factor into [0, 1]; NaN becomes 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Validate farm size in hectares
pub fn validate_farm_size(size: f64) -> CoreResult<()> {
    validate_finite("farm_size", size)?;
    if size <= 0.0 {
        return Err(CoreError::validation("farm_size", "must be greater than 0"));
    }
    Ok(())
}

/// Validate a VaR confidence level, exclusive of 0 and 1
pub fn validate_confidence_level(level: f64) -> CoreResult<()> {
    if level.is_finite() && level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(CoreError::validation(
            "confidence_level",
            "must be strictly between 0 and 1",
        ))
    }
}

/// Validate a crop name: 1-64 characters of letters, digits, spaces, `_` or `-`
pub fn validate_crop_name(name: &str) -> CoreResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("crop", "crop name cannot be empty"));
    }
    if trimmed.chars().count() > 64 {
        return Err(CoreError::validation("crop", "crop name must be at most 64 characters"));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '_' || c == '-')
    {
        return Err(CoreError::validation(
            "crop",
            "crop name may only contain letters, digits, spaces, '_' and '-'",
        ));
    }
    Ok(())
}

// ============================================================================
// Series Validations
// ============================================================================

/// Validate a price series: non-empty, finite, non-negative
pub fn validate_price_series(field: &str, prices: &[f64]) -> CoreResult<()> {
    if prices.is_empty() {
        return Err(CoreError::validation(field, "price history is required"));
    }
    if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(CoreError::validation(
            field,
            "prices must be finite and non-negative",
        ));
    }
    Ok(())
}

/// Validate a training or prediction matrix and return its width.
///
/// Rows must be non-empty, equally wide and finite.
pub fn validate_matrix(field: &str, rows: &[Vec<f64>]) -> CoreResult<usize> {
    let width = match rows.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(CoreError::validation(field, "matrix must have at least one non-empty row")),
    };
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(CoreError::validation(
                field,
                format!("row {} has {} columns, expected {}", i, row.len(), width),
            ));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::validation(field, format!("row {} contains a non-finite value", i)));
        }
    }
    Ok(width)
}

/// Validate a single feature row against the width a model was trained on
pub fn validate_row_width(field: &str, row: &[f64], expected: usize) -> CoreResult<()> {
    if row.len() != expected {
        return Err(CoreError::validation(
            field,
            format!("expected {} features, got {}", expected, row.len()),
        ));
    }
    if row.iter().any(|v| !v.is_finite()) {
        return Err(CoreError::validation(field, "features must be finite"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_unit_interval() {
        assert!(validate_unit_interval("risk_factor", 0.0).is_ok());
        assert!(validate_unit_interval("risk_factor", 1.0).is_ok());
        assert!(validate_unit_interval("risk_factor", 1.01).is_err());
        assert!(validate_unit_interval("risk_factor", -0.1).is_err());
        assert!(validate_unit_interval("risk_factor", f64::NAN).is_err());
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(-2.0), 0.0);
        assert_eq!(clamp_unit(0.3), 0.3);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_validate_farm_size() {
        assert!(validate_farm_size(2.5).is_ok());
        assert!(validate_farm_size(0.0).is_err());
        assert!(validate_farm_size(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_crop_name() {
        assert!(validate_crop_name("rice").is_ok());
        assert!(validate_crop_name("sugar cane").is_ok());
        assert!(validate_crop_name("   ").is_err());
        assert!(validate_crop_name("rice;drop").is_err());
        assert!(validate_crop_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_price_series() {
        assert!(validate_price_series("prices", &[1.0, 2.0]).is_ok());
        assert!(validate_price_series("prices", &[]).is_err());
        assert!(validate_price_series("prices", &[1.0, -2.0]).is_err());
        assert!(validate_price_series("prices", &[f64::NAN]).is_err());
    }

    #[test]
    fn test_validate_matrix() {
        assert_eq!(validate_matrix("x", &[vec![1.0, 2.0], vec![3.0, 4.0]]), Ok(2));
        assert!(validate_matrix("x", &[]).is_err());
        assert!(validate_matrix("x", &[vec![]]).is_err());
        assert!(validate_matrix("x", &[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(validate_matrix("x", &[vec![1.0, f64::NAN]]).is_err());
    }

    #[test]
    fn test_validate_confidence_level() {
        assert!(validate_confidence_level(0.95).is_ok());
        assert!(validate_confidence_level(1.0).is_err());
        assert!(validate_confidence_level(0.0).is_err());
    }
}
