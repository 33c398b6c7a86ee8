//! Common types used across the engine

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Inclusive date range for market history queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days ending at (and including) `end`.
    ///
    /// Fails instead of wrapping when the start would fall outside the
    /// representable calendar.
    pub fn trailing_days(end: NaiveDate, days: i64) -> CoreResult<Self> {
        let span = Duration::try_days(days.max(0))
            .ok_or_else(|| CoreError::validation("history_days", "window is too long"))?;
        let start = end.checked_sub_signed(span).ok_or_else(|| {
            CoreError::validation("as_of", format!("{} days before {} is out of range", days, end))
        })?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Risk appetite used when computing risk-adjusted metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.9,
            RiskLevel::Medium => 1.0,
            RiskLevel::High => 1.2,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trailing_range_is_inclusive() {
        let range = DateRange::trailing_days(date(2024, 6, 30), 365).unwrap();
        assert_eq!(range.start, date(2023, 7, 1));
        assert!(range.contains(date(2024, 6, 30)));
        assert!(range.contains(date(2023, 7, 1)));
        assert!(!range.contains(date(2023, 6, 30)));
    }

    #[test]
    fn test_trailing_range_out_of_calendar() {
        let err = DateRange::trailing_days(NaiveDate::MIN, 30).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "as_of"));

        let err = DateRange::trailing_days(date(2024, 6, 30), i64::MAX / 1000).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "history_days"));
    }

    #[test]
    fn test_risk_multipliers() {
        assert_eq!(RiskLevel::Low.multiplier(), 0.9);
        assert_eq!(RiskLevel::Medium.multiplier(), 1.0);
        assert_eq!(RiskLevel::High.multiplier(), 1.2);
    }
}
