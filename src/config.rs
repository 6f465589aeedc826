use crate::error::{FinanceError, Result};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tunables for the trend forecaster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ForecastSettings {
    /// Std-dev of expense jitter as a fraction of recent average expenses.
    pub expense_noise_ratio: f64,
    /// Std-dev of income jitter as a fraction of recent average income.
    pub income_noise_ratio: f64,
    /// Number of trailing months averaged as the forecast base.
    pub recent_window: usize,
    pub confidence_start: u32,
    pub confidence_step: u32,
    pub confidence_floor: u32,
    /// Category forecasts move the mean by a uniform factor in `[-bound, bound)`.
    pub category_jitter_bound: f64,
    pub category_confidence_per_sample: u32,
    pub category_confidence_cap: u32,
    /// Confidence lost per period by the growth baseline, starting from `confidence_start`.
    pub growth_confidence_step: u32,
    pub growth_confidence_floor: u32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            expense_noise_ratio: 0.05,
            income_noise_ratio: 0.02,
            recent_window: 3,
            confidence_start: 95,
            confidence_step: 5,
            confidence_floor: 60,
            category_jitter_bound: 0.1,
            category_confidence_per_sample: 10,
            category_confidence_cap: 90,
            growth_confidence_step: 3,
            growth_confidence_floor: 70,
        }
    }
}

/// The 50/30/20 split and the buffers applied on top of current averages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct BudgetSettings {
    pub needs_share: f64,
    pub wants_share: f64,
    pub savings_share: f64,
    pub essential_buffer: f64,
    pub discretionary_buffer: f64,
    /// Largest fraction of the needs budget one essential category may take.
    pub essential_cap_share: f64,
    /// Largest fraction of the wants budget one discretionary category may take.
    pub discretionary_cap_share: f64,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            needs_share: 0.5,
            wants_share: 0.3,
            savings_share: 0.2,
            essential_buffer: 0.1,
            discretionary_buffer: 0.05,
            essential_cap_share: 0.3,
            discretionary_cap_share: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct InsightSettings {
    /// Top-category share (percent) above which a savings recommendation is made.
    pub recommendation_threshold: f64,
    /// Top-category share (percent) above which an alert is raised.
    pub alert_threshold: f64,
    /// Fraction of the top category assumed recoverable by cutting back.
    pub reduction_ratio: f64,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            recommendation_threshold: 30.0,
            alert_threshold: 40.0,
            reduction_ratio: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct CoreConfig {
    pub forecast: ForecastSettings,
    pub budget: BudgetSettings,
    pub insights: InsightSettings,
}

impl CoreConfig {
    /// Parses a JSON document. Missing sections and fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!("Loaded core configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let forecast = &self.forecast;
        for ratio in [
            forecast.expense_noise_ratio,
            forecast.income_noise_ratio,
            forecast.category_jitter_bound,
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(FinanceError::InvalidNoiseRatio(ratio));
            }
        }

        if forecast.recent_window == 0 {
            return Err(FinanceError::InvalidSetting(
                "forecast.recent_window must be at least 1".to_string(),
            ));
        }

        if forecast.confidence_floor > forecast.confidence_start {
            return Err(FinanceError::InvalidSetting(format!(
                "forecast.confidence_floor ({}) exceeds confidence_start ({})",
                forecast.confidence_floor, forecast.confidence_start
            )));
        }

        if forecast.growth_confidence_floor > forecast.confidence_start {
            return Err(FinanceError::InvalidSetting(format!(
                "forecast.growth_confidence_floor ({}) exceeds confidence_start ({})",
                forecast.growth_confidence_floor, forecast.confidence_start
            )));
        }

        let budget = &self.budget;
        let split = budget.needs_share + budget.wants_share + budget.savings_share;
        if (split - 1.0).abs() > 0.01 {
            return Err(FinanceError::InvalidSetting(format!(
                "budget shares must sum to 1.0 (got {})",
                split
            )));
        }

        for (name, share) in [
            ("needs_share", budget.needs_share),
            ("wants_share", budget.wants_share),
            ("savings_share", budget.savings_share),
            ("essential_buffer", budget.essential_buffer),
            ("discretionary_buffer", budget.discretionary_buffer),
            ("essential_cap_share", budget.essential_cap_share),
            ("discretionary_cap_share", budget.discretionary_cap_share),
        ] {
            if share < 0.0 {
                return Err(FinanceError::InvalidSetting(format!(
                    "budget.{} must be non-negative (got {})",
                    name, share
                )));
            }
        }

        Ok(())
    }
}
