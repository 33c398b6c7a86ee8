//! Profitability models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::RiskLevel;

/// Production input cost categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Seeds,
    Fertilizer,
    Irrigation,
    Labor,
    Equipment,
    Storage,
    Transport,
    Insurance,
}

impl CostCategory {
    pub const ALL: [CostCategory; 8] = [
        CostCategory::Seeds,
        CostCategory::Fertilizer,
        CostCategory::Irrigation,
        CostCategory::Labor,
        CostCategory::Equipment,
        CostCategory::Storage,
        CostCategory::Transport,
        CostCategory::Insurance,
    ];
}

/// Per-unit-area input costs keyed by category
pub type InputCosts = BTreeMap<CostCategory, f64>;

/// Market terms for a single crop sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarketTerms {
    pub price_per_ton: f64,
    /// Risk haircut on profit in [0, 1]; callers validate the range
    pub risk_factor: f64,
}

/// Growing conditions. Quality factors are multiplicative dampers in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GrowingConditions {
    pub weather_quality: f64,
    pub soil_quality: f64,
    pub management_efficiency: f64,
    /// Tons per unit area under ideal conditions
    pub base_yield: f64,
}

/// Outcome of a profitability analysis. Derived once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitabilityResult {
    pub crop: String,
    pub total_cost: f64,
    pub estimated_yield: f64,
    pub expected_revenue: f64,
    pub projected_profit: f64,
    /// `projected_profit / total_cost`, exactly 0 when there is no cost
    pub roi: f64,
    pub risk_factor: f64,
    /// Price per ton that covers `total_cost`; `+inf` when nothing is harvested
    /// (serialised as `null`)
    pub break_even_price: f64,
}

/// Risk-adjusted view of a forecast revenue series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskMetrics {
    pub expected_revenue: f64,
    pub revenue_std: f64,
    pub value_at_risk: f64,
    /// Percent, never negative
    pub risk_adjusted_roi: f64,
    pub sharpe_ratio: f64,
    pub risk_level: RiskLevel,
    pub total_risk_factor: f64,
}
