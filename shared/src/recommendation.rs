//! Prediction orchestrator
//!
//! For each candidate crop: market history → features → suitability and price
//! models → profitability → ranking. Request-level problems (farm size, crop
//! names, soil) fail the whole call; anything that goes wrong for one crop only
//! moves that crop to `skipped`.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::features::{build_crop_features, build_price_features, seasonal_factor};
use crate::forecast::{forecast_price_trend, price_outlook, MarketIndicator};
use crate::learning::{PriceModels, SuitabilityModel};
use crate::models::{
    CostCategory, CropRecommendation, GrowingConditions, InputCosts, MarketAnalysis,
    MarketSnapshot, MarketTerms, Recommendation, RecommendationRequest, SkippedCrop, SoilProfile,
    SoilType, WeatherObservation,
};
use crate::profitability::ProfitCalculator;
use crate::providers::{MarketProvider, SoilProvider, WeatherProvider};
use crate::types::{DateRange, RiskLevel};
use crate::validation::{
    clamp_unit, validate_confidence_level, validate_crop_name, validate_farm_size,
};

/// Reason recorded for crops without market history
pub const INSUFFICIENT_MARKET_DATA: &str = "insufficient market data";

/// Longest market history window accepted, in days (a century)
pub const MAX_HISTORY_DAYS: i64 = 36_525;

/// Weights of the sentiment indicators fed to the trend forecaster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndicatorWeights {
    pub demand: f64,
    pub supply: f64,
    pub market_trend: f64,
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self {
            demand: 0.4,
            supply: 0.3,
            market_trend: 0.3,
        }
    }
}

/// Tunables for [`Recommender`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommenderSettings {
    /// Per-hectare input costs
    pub input_costs: InputCosts,
    pub management_efficiency: f64,
    /// Tons per hectare under ideal conditions
    pub base_yield: f64,
    pub risk_factor: f64,
    /// Used when the location has no weather observation or no weather score
    pub default_weather_quality: f64,
    pub default_soil_quality: f64,
    pub forecast_periods: usize,
    /// Length of the trailing market history window
    pub history_days: i64,
    pub confidence_level: f64,
    pub risk_level: RiskLevel,
    pub indicator_weights: IndicatorWeights,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        let input_costs = [
            (CostCategory::Seeds, 100.0),
            (CostCategory::Fertilizer, 200.0),
            (CostCategory::Irrigation, 150.0),
            (CostCategory::Labor, 300.0),
            (CostCategory::Equipment, 250.0),
        ]
        .into_iter()
        .collect();

        Self {
            input_costs,
            management_efficiency: 0.9,
            base_yield: 1.0,
            risk_factor: 0.1,
            default_weather_quality: 0.8,
            default_soil_quality: 0.8,
            forecast_periods: 12,
            history_days: 365,
            confidence_level: 0.95,
            risk_level: RiskLevel::Medium,
            indicator_weights: IndicatorWeights::default(),
        }
    }
}

impl RecommenderSettings {
    pub fn validate(&self) -> CoreResult<()> {
        if self.forecast_periods == 0 {
            return Err(CoreError::validation(
                "forecast_periods",
                "must be at least 1",
            ));
        }
        if self.history_days <= 0 || self.history_days > MAX_HISTORY_DAYS {
            return Err(CoreError::validation(
                "history_days",
                format!("must be between 1 and {}", MAX_HISTORY_DAYS),
            ));
        }
        validate_confidence_level(self.confidence_level)
    }
}

/// Composes providers, models and the profitability engine
pub struct Recommender {
    settings: RecommenderSettings,
    calculator: ProfitCalculator,
    weather: Box<dyn WeatherProvider>,
    market: Box<dyn MarketProvider>,
    soil: Box<dyn SoilProvider>,
    suitability: SuitabilityModel,
    price_models: PriceModels,
}

impl Recommender {
    pub fn new(
        settings: RecommenderSettings,
        weather: Box<dyn WeatherProvider>,
        market: Box<dyn MarketProvider>,
        soil: Box<dyn SoilProvider>,
    ) -> CoreResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            calculator: ProfitCalculator::new(),
            weather,
            market,
            soil,
            suitability: SuitabilityModel::new(),
            price_models: PriceModels::new(),
        })
    }

    pub fn with_calculator(mut self, calculator: ProfitCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_suitability_model(mut self, model: SuitabilityModel) -> Self {
        self.suitability = model;
        self
    }

    pub fn with_price_models(mut self, models: PriceModels) -> Self {
        self.price_models = models;
        self
    }

    pub fn settings(&self) -> &RecommenderSettings {
        &self.settings
    }

    pub fn suitability_model(&self) -> &SuitabilityModel {
        &self.suitability
    }

    pub fn price_models(&self) -> &PriceModels {
        &self.price_models
    }

    /// Rank the requested crops by projected profit, highest first.
    pub fn recommend(&self, request: &RecommendationRequest) -> CoreResult<Recommendation> {
        validate_farm_size(request.farm_size)?;
        if request.crops.is_empty() {
            return Err(CoreError::validation("crops", "at least one crop is required"));
        }
        for crop in &request.crops {
            validate_crop_name(crop)?;
        }
        let soil = self.resolve_soil(request)?;

        let weather = self.weather.current_weather(&request.location);
        if weather.is_none() {
            tracing::warn!(location = %request.location, "Weather unavailable, using default quality");
        }
        let weather_window: Vec<WeatherObservation> = weather.iter().cloned().collect();
        let weather_quality = weather
            .as_ref()
            .and_then(|w| w.weather_score)
            .map(clamp_unit)
            .unwrap_or_else(|| clamp_unit(self.settings.default_weather_quality));

        let region = request
            .region
            .as_deref()
            .unwrap_or(&request.location);
        let range = DateRange::trailing_days(request.as_of, self.settings.history_days)?;

        let context = CropContext {
            soil: &soil,
            weather: &weather_window,
            weather_quality,
            region,
            range: &range,
            as_of: request.as_of,
        };

        let mut ranked = Vec::new();
        let mut skipped = Vec::new();
        for crop in &request.crops {
            let crop = crop.trim();
            match self.analyze_crop(crop, &context) {
                Ok(result) => ranked.push(result),
                Err(reason) => {
                    tracing::warn!(crop = %crop, reason = %reason, "Crop skipped");
                    skipped.push(SkippedCrop {
                        crop: crop.to_string(),
                        reason,
                    });
                }
            }
        }

        // stable: equal profits keep request order
        ranked.sort_by(|a, b| {
            b.profitability
                .projected_profit
                .total_cmp(&a.profitability.projected_profit)
        });

        tracing::info!(
            location = %request.location,
            ranked = ranked.len(),
            skipped = skipped.len(),
            "Recommendation complete"
        );

        Ok(Recommendation {
            location: request.location.clone(),
            soil,
            weather,
            ranked,
            skipped,
        })
    }

    fn resolve_soil(&self, request: &RecommendationRequest) -> CoreResult<SoilProfile> {
        let soil_type = match request.soil_type.as_deref() {
            Some(raw) => raw.parse::<SoilType>()?,
            None => self
                .soil
                .soil_profile(&request.location)
                .map(|profile| profile.soil_type)
                .ok_or_else(|| {
                    CoreError::validation(
                        "soil_type",
                        format!("no soil type given and none known for {}", request.location),
                    )
                })?,
        };
        Ok(SoilProfile::new(soil_type, request.farm_size))
    }

    /// One crop's analysis; the error is the reason the crop is skipped
    fn analyze_crop(&self, crop: &str, ctx: &CropContext<'_>) -> Result<CropRecommendation, String> {
        let records = self.market.market_history(ctx.region, crop, ctx.range);
        let (snapshot, analysis) = match (
            MarketSnapshot::from_records(&records),
            MarketAnalysis::from_records(&records),
        ) {
            (Some(snapshot), Some(analysis)) => (snapshot, analysis),
            _ => return Err(INSUFFICIENT_MARKET_DATA.to_string()),
        };
        self.build_crop_result(crop, ctx, snapshot, analysis)
            .map_err(|e| e.to_string())
    }

    fn build_crop_result(
        &self,
        crop: &str,
        ctx: &CropContext<'_>,
        snapshot: MarketSnapshot,
        analysis: MarketAnalysis,
    ) -> CoreResult<CropRecommendation> {
        let features = build_crop_features(ctx.weather, ctx.soil, &snapshot, ctx.as_of)?;
        tracing::debug!(crop = %crop, history = snapshot.price_history.len(), "Crop features built");

        let suitability_score = if self.suitability.is_trained() {
            Some(self.suitability.suitability_score(crop, features.values())?)
        } else {
            None
        };

        let price_forecast = if self.price_models.is_trained(crop) {
            let matrix = build_price_features(&snapshot.price_history, &snapshot)?;
            Some(self.price_models.predict_future_price(
                crop,
                &matrix,
                self.settings.forecast_periods,
            )?)
        } else {
            None
        };
        let price_outlook = price_forecast
            .as_ref()
            .and_then(|f| price_outlook(&f.prices, f.confidence));

        let conditions = GrowingConditions {
            weather_quality: ctx.weather_quality,
            soil_quality: clamp_unit(self.settings.default_soil_quality),
            management_efficiency: clamp_unit(self.settings.management_efficiency),
            base_yield: self.settings.base_yield,
        };
        let market_terms = MarketTerms {
            price_per_ton: snapshot.current_price,
            risk_factor: clamp_unit(self.settings.risk_factor),
        };
        let profitability = self.calculator.analyze_profitability(
            crop,
            ctx.soil.farm_area,
            &market_terms,
            &conditions,
            &self.settings.input_costs,
        )?;

        let trend_forecast = forecast_price_trend(
            &snapshot.price_history,
            &self.upcoming_seasonal_factors(ctx.as_of),
            &self.indicators(&snapshot),
            self.settings.forecast_periods,
        )?;
        let revenue_forecast: Vec<f64> = trend_forecast
            .iter()
            .map(|price| price * profitability.estimated_yield)
            .collect();
        let risk_metrics = self.calculator.calculate_risk_adjusted_metrics(
            profitability.total_cost,
            &revenue_forecast,
            self.settings.risk_level,
            self.settings.confidence_level,
        )?;

        Ok(CropRecommendation {
            crop: crop.to_string(),
            suitability_score,
            price_forecast,
            price_outlook,
            market_analysis: analysis,
            trend_forecast,
            profitability,
            risk_metrics,
        })
    }

    /// Seasonal factors for each forecast month after `as_of`
    fn upcoming_seasonal_factors(&self, as_of: NaiveDate) -> Vec<f64> {
        (1..=self.settings.forecast_periods as u32)
            .filter_map(|k| as_of.checked_add_months(Months::new(k)))
            .map(seasonal_factor)
            .collect()
    }

    /// Supply pressure counts against the price
    fn indicators(&self, snapshot: &MarketSnapshot) -> Vec<MarketIndicator> {
        let weights = &self.settings.indicator_weights;
        vec![
            MarketIndicator::new("demand", snapshot.demand_index, weights.demand),
            MarketIndicator::new("supply", -snapshot.supply_index, weights.supply),
            MarketIndicator::new("market_trend", snapshot.market_trend(), weights.market_trend),
        ]
    }
}

/// Request-wide inputs shared by every crop's analysis
struct CropContext<'a> {
    soil: &'a SoilProfile,
    weather: &'a [WeatherObservation],
    weather_quality: f64,
    region: &'a str,
    range: &'a DateRange,
    as_of: NaiveDate,
}
