use crate::config::ForecastSettings;
use crate::error::{FinanceError, Result};
use crate::noise::NoiseSource;
use crate::schema::{CategoryForecast, CategoryStat, ForecastPoint, MonthlyAggregate};
use crate::utils::{linear_trend, tail_mean};
use log::{debug, warn};
use std::collections::BTreeMap;

const GROWTH_PER_MONTH: f64 = 0.02;

pub struct Forecaster {
    settings: ForecastSettings,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(ForecastSettings::default())
    }
}

impl Forecaster {
    pub fn new(settings: ForecastSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Linear-trend extrapolation of the monthly series with normal jitter.
    ///
    /// Needs at least two months of history; returns an empty forecast otherwise.
    pub fn simple_forecast<N: NoiseSource + ?Sized>(
        &self,
        monthly: &[MonthlyAggregate],
        periods: usize,
        noise: &mut N,
    ) -> Vec<ForecastPoint> {
        if monthly.len() < 2 {
            debug!(
                "Skipping forecast: {} month(s) of history, need at least 2",
                monthly.len()
            );
            return Vec::new();
        }

        let expenses: Vec<f64> = monthly.iter().map(|m| m.expenses).collect();
        let income: Vec<f64> = monthly.iter().map(|m| m.income).collect();

        let expense_trend = linear_trend(&expenses);
        let income_trend = linear_trend(&income);

        let recent_expenses = tail_mean(&expenses, self.settings.recent_window);
        let recent_income = tail_mean(&income, self.settings.recent_window);

        debug!(
            "Forecasting {} period(s): expense trend {:.2}/month from {:.2}, income trend {:.2}/month from {:.2}",
            periods, expense_trend, recent_expenses, income_trend, recent_income
        );

        let expense_sigma = recent_expenses * self.settings.expense_noise_ratio;
        let income_sigma = recent_income * self.settings.income_noise_ratio;

        (1..=periods)
            .map(|i| {
                let step = i as f64;
                let predicted_expenses =
                    recent_expenses + expense_trend * step + noise.normal(expense_sigma);
                let predicted_income =
                    recent_income + income_trend * step + noise.normal(income_sigma);

                ForecastPoint {
                    period_label: format!("Month +{}", i),
                    predicted_expenses: predicted_expenses.max(0.0),
                    predicted_income: predicted_income.max(0.0),
                    predicted_savings: predicted_income - predicted_expenses,
                    confidence: self.period_confidence(i),
                }
            })
            .collect()
    }

    /// Per-category next-period estimate, sorted by predicted amount, largest first.
    ///
    /// `periods` does not change the estimate; every category gets a single point.
    /// A category whose mean is exactly zero has no defined percentage change and
    /// fails the call with [`FinanceError::DivisionByZero`].
    pub fn category_forecast<N: NoiseSource + ?Sized>(
        &self,
        stats: &BTreeMap<String, CategoryStat>,
        periods: usize,
        noise: &mut N,
    ) -> Result<Vec<CategoryForecast>> {
        debug!(
            "Forecasting {} categories ({} period horizon)",
            stats.len(),
            periods
        );

        let bound = self.settings.category_jitter_bound;
        let mut forecasts = Vec::with_capacity(stats.len());

        for (category, stat) in stats {
            if stat.count == 0 {
                continue;
            }

            if stat.mean == 0.0 {
                warn!("Category '{}' has a zero mean; change percent is undefined", category);
                return Err(FinanceError::DivisionByZero {
                    context: format!("change percent for category '{}'", category),
                });
            }

            let predicted_amount = stat.mean * (1.0 + noise.uniform(-bound, bound));
            let confidence = (stat.count as u64)
                .saturating_mul(self.settings.category_confidence_per_sample as u64)
                .min(self.settings.category_confidence_cap as u64) as u32;

            forecasts.push(CategoryForecast {
                category: category.clone(),
                current_avg: stat.mean,
                predicted_amount,
                change_percent: (predicted_amount - stat.mean) / stat.mean * 100.0,
                confidence,
            });
        }

        forecasts.sort_by(|a, b| b.predicted_amount.total_cmp(&a.predicted_amount));
        Ok(forecasts)
    }

    /// Deterministic baseline: the historical monthly average grown 2% per future month.
    ///
    /// Confidence starts from `confidence_start` and decays by `growth_confidence_step`
    /// down to `growth_confidence_floor`.
    pub fn growth_forecast(
        &self,
        total_expenses: f64,
        history_months: u32,
        periods: usize,
    ) -> Vec<ForecastPoint> {
        if history_months == 0 {
            return Vec::new();
        }

        let monthly_average = total_expenses.abs() / history_months as f64;

        (1..=periods)
            .map(|i| {
                let predicted_expenses = monthly_average * (1.0 + i as f64 * GROWTH_PER_MONTH);
                let confidence = self
                    .settings
                    .confidence_start
                    .saturating_sub(
                        self.settings
                            .growth_confidence_step
                            .saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)),
                    )
                    .max(self.settings.growth_confidence_floor);

                ForecastPoint {
                    period_label: format!("Month +{}", i),
                    predicted_expenses,
                    predicted_income: 0.0,
                    predicted_savings: -predicted_expenses,
                    confidence,
                }
            })
            .collect()
    }

    fn period_confidence(&self, period: usize) -> u32 {
        let decay = self
            .settings
            .confidence_step
            .saturating_mul(u32::try_from(period).unwrap_or(u32::MAX));
        self.settings
            .confidence_start
            .saturating_sub(decay)
            .max(self.settings.confidence_floor)
    }
}

pub fn simple_forecast<N: NoiseSource + ?Sized>(
    monthly: &[MonthlyAggregate],
    periods: usize,
    noise: &mut N,
) -> Vec<ForecastPoint> {
    Forecaster::default().simple_forecast(monthly, periods, noise)
}

pub fn category_forecast<N: NoiseSource + ?Sized>(
    stats: &BTreeMap<String, CategoryStat>,
    periods: usize,
    noise: &mut N,
) -> Result<Vec<CategoryForecast>> {
    Forecaster::default().category_forecast(stats, periods, noise)
}
