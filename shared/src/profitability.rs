//! Profitability and risk calculations
//!
//! All arithmetic is plain `f64`. Degenerate denominators resolve to explicit
//! sentinels instead of NaN: ROI is 0 without cost, break-even price is `+inf`
//! without yield, the Sharpe-like ratio is 0 without dispersion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    CostCategory, GrowingConditions, InputCosts, MarketTerms, ProfitabilityResult, RiskMetrics,
};
use crate::stats;
use crate::types::RiskLevel;
use crate::validation::{validate_confidence_level, validate_finite};

/// Base risk components summed into the total risk factor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskFactors {
    pub weather_risk: f64,
    pub market_risk: f64,
    pub pest_risk: f64,
    pub storage_risk: f64,
}

impl Default for RiskFactors {
    fn default() -> Self {
        Self {
            weather_risk: 0.1,
            market_risk: 0.1,
            pest_risk: 0.05,
            storage_risk: 0.05,
        }
    }
}

impl RiskFactors {
    pub fn total(&self) -> f64 {
        self.weather_risk + self.market_risk + self.pest_risk + self.storage_risk
    }
}

/// Cost, yield, revenue and risk calculator
#[derive(Debug, Clone)]
pub struct ProfitCalculator {
    cost_factors: BTreeMap<CostCategory, f64>,
    risk_factors: RiskFactors,
    risk_free_rate: f64,
}

impl Default for ProfitCalculator {
    fn default() -> Self {
        Self {
            cost_factors: CostCategory::ALL.iter().map(|c| (*c, 1.0)).collect(),
            risk_factors: RiskFactors::default(),
            risk_free_rate: 0.02,
        }
    }
}

impl ProfitCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the multiplier applied to one cost category
    pub fn with_cost_factor(mut self, category: CostCategory, factor: f64) -> Self {
        self.cost_factors.insert(category, factor);
        self
    }

    pub fn with_risk_factors(mut self, risk_factors: RiskFactors) -> Self {
        self.risk_factors = risk_factors;
        self
    }

    pub fn cost_factor(&self, category: CostCategory) -> f64 {
        self.cost_factors.get(&category).copied().unwrap_or(1.0)
    }

    /// `area * Σ(input_cost * cost_factor)`
    pub fn calculate_production_cost(&self, area: f64, input_costs: &InputCosts) -> f64 {
        let per_area: f64 = input_costs
            .iter()
            .map(|(category, cost)| cost * self.cost_factor(*category))
            .sum();
        area * per_area
    }

    /// Multiplicative yield model; a zero in any factor zeroes the yield
    pub fn estimate_yield(&self, area: f64, conditions: &GrowingConditions) -> f64 {
        area * conditions.base_yield
            * conditions.weather_quality
            * conditions.soil_quality
            * conditions.management_efficiency
    }

    pub fn calculate_revenue(&self, estimated_yield: f64, price_per_ton: f64) -> f64 {
        estimated_yield * price_per_ton
    }

    /// Profit after the risk haircut. `risk_factor` is not clamped here.
    pub fn calculate_profit(&self, revenue: f64, total_cost: f64, risk_factor: f64) -> f64 {
        (revenue - total_cost) * (1.0 - risk_factor)
    }

    pub fn calculate_roi(&self, profit: f64, total_cost: f64) -> f64 {
        if total_cost > 0.0 {
            profit / total_cost
        } else {
            0.0
        }
    }

    pub fn calculate_break_even_price(&self, total_cost: f64, estimated_yield: f64) -> f64 {
        if estimated_yield > 0.0 {
            total_cost / estimated_yield
        } else {
            f64::INFINITY
        }
    }

    /// Full profitability analysis for one crop on `area` hectares.
    pub fn analyze_profitability(
        &self,
        crop: &str,
        area: f64,
        market: &MarketTerms,
        conditions: &GrowingConditions,
        input_costs: &InputCosts,
    ) -> CoreResult<ProfitabilityResult> {
        validate_finite("area", area)?;
        validate_finite("price_per_ton", market.price_per_ton)?;
        validate_finite("risk_factor", market.risk_factor)?;
        validate_finite("weather_quality", conditions.weather_quality)?;
        validate_finite("soil_quality", conditions.soil_quality)?;
        validate_finite("management_efficiency", conditions.management_efficiency)?;
        validate_finite("base_yield", conditions.base_yield)?;
        for cost in input_costs.values() {
            validate_finite("input_costs", *cost)?;
        }

        let total_cost = self.calculate_production_cost(area, input_costs);
        let estimated_yield = self.estimate_yield(area, conditions);
        let expected_revenue = self.calculate_revenue(estimated_yield, market.price_per_ton);
        let projected_profit = self.calculate_profit(expected_revenue, total_cost, market.risk_factor);
        let roi = self.calculate_roi(projected_profit, total_cost);

        if !projected_profit.is_finite() || !roi.is_finite() {
            return Err(CoreError::Computation(format!(
                "profitability for {} overflowed",
                crop
            )));
        }

        Ok(ProfitabilityResult {
            crop: crop.to_string(),
            total_cost,
            estimated_yield,
            expected_revenue,
            projected_profit,
            roi,
            risk_factor: market.risk_factor,
            break_even_price: self.calculate_break_even_price(total_cost, estimated_yield),
        })
    }

    /// Risk-adjusted metrics over a forecast revenue series.
    pub fn calculate_risk_adjusted_metrics(
        &self,
        investment: f64,
        revenue_forecast: &[f64],
        risk_level: RiskLevel,
        confidence_level: f64,
    ) -> CoreResult<RiskMetrics> {
        validate_finite("investment", investment)?;
        validate_confidence_level(confidence_level)?;
        if revenue_forecast.iter().any(|r| !r.is_finite()) {
            return Err(CoreError::validation("revenue_forecast", "revenues must be finite"));
        }
        let expected_revenue = stats::mean(revenue_forecast).ok_or_else(|| {
            CoreError::Computation("revenue forecast is empty".to_string())
        })?;
        let revenue_std = stats::population_std(revenue_forecast).unwrap_or(0.0);

        let total_risk = self.risk_factors.total() * risk_level.multiplier();
        let z = stats::normal_ppf(1.0 - confidence_level).ok_or_else(|| {
            CoreError::Computation("confidence level outside the normal quantile domain".to_string())
        })?;
        let value_at_risk = z * revenue_std;

        let base_roi = if investment > 0.0 {
            (expected_revenue - investment) / investment * 100.0
        } else {
            0.0
        };
        let risk_adjusted_roi = (base_roi - total_risk * 100.0).max(0.0);

        let sharpe_ratio = if revenue_std > 0.0 && investment > 0.0 {
            ((expected_revenue - investment) / investment - self.risk_free_rate) / revenue_std
        } else {
            0.0
        };

        Ok(RiskMetrics {
            expected_revenue,
            revenue_std,
            value_at_risk,
            risk_adjusted_roi,
            sharpe_ratio,
            risk_level,
            total_risk_factor: total_risk,
        })
    }
}
