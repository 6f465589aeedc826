//! # Personal Finance Core
//!
//! The computational core of a personal-finance backend. The request layer loads a
//! user's transactions, hands them to this crate as plain values and serializes what
//! comes back.
//!
//! ## Components
//!
//! - **Aggregator**: monthly income/expense/savings series and per-category statistics
//! - **Forecaster**: linear-trend extrapolation with injectable random jitter
//! - **Categorizer**: keyword-scored category assignment for free-text descriptions
//! - **Advisor**: top-category insights and 50/30/20 budget recommendations
//! - **Chat**: canned replies selected by keyword from a metrics snapshot
//!
//! ## Example
//!
//! ```rust,ignore
//! use personal_finance_core::*;
//!
//! let core = FinanceCore::default();
//! let transactions = core.ingest(&raw_records)?;
//!
//! let mut noise = RandNoise::seeded(42);
//! let report = core.forecast_report(&transactions, 6, &mut noise)?;
//!
//! let summary = summarize(&transactions);
//! let reply = respond("How can I save more?", &summary);
//! ```

pub mod advisor;
pub mod aggregator;
pub mod categorizer;
pub mod chat;
pub mod config;
pub mod currency;
pub mod error;
pub mod forecaster;
pub mod ingestion;
pub mod noise;
pub mod schema;
pub mod utils;

pub use advisor::Advisor;
pub use aggregator::{category_stats, category_totals, prepare_monthly, summarize};
pub use categorizer::{categorize, categorize_expense, Categorizer, CategoryRule};
pub use chat::{classify, respond, ChatIntent, ChatResponder};
pub use config::{BudgetSettings, CoreConfig, ForecastSettings, InsightSettings};
pub use currency::{CurrencyFormatter, RupeeFormatter, SymbolFormatter};
pub use error::{FinanceError, Result};
pub use forecaster::{category_forecast, simple_forecast, Forecaster};
pub use ingestion::{validate_batch, validate_transaction, RawTransaction};
pub use noise::{NoiseSource, RandNoise, ZeroNoise};
pub use schema::*;
pub use utils::{parse_month_key, MonthKey};

use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything the forecast endpoint returns for one transaction batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ForecastReport {
    pub monthly: Vec<MonthlyAggregate>,
    pub forecast: Vec<ForecastPoint>,
    pub category_forecast: Vec<CategoryForecast>,
}

/// The components wired to one configuration.
pub struct FinanceCore {
    categorizer: Categorizer,
    forecaster: Forecaster,
    advisor: Advisor,
}

impl Default for FinanceCore {
    fn default() -> Self {
        Self::from_parts(CoreConfig::default())
    }
}

impl FinanceCore {
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: CoreConfig) -> Self {
        Self {
            categorizer: Categorizer::new(),
            forecaster: Forecaster::new(config.forecast),
            advisor: Advisor::new(config.budget, config.insights),
        }
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn forecaster(&self) -> &Forecaster {
        &self.forecaster
    }

    pub fn advisor(&self) -> &Advisor {
        &self.advisor
    }

    /// Validates raw records, filling in missing categories.
    pub fn ingest(&self, raw: &[RawTransaction]) -> Result<Vec<Transaction>> {
        let transactions = validate_batch(raw, &self.categorizer)?;
        debug!("Ingested {} transaction(s)", transactions.len());
        Ok(transactions)
    }

    /// Monthly series, trend forecast and per-category forecast for one batch.
    ///
    /// Categories whose expenses are all zero have no percentage change and are left
    /// out of `category_forecast` rather than failing the report.
    pub fn forecast_report<N: NoiseSource + ?Sized>(
        &self,
        transactions: &[Transaction],
        periods: usize,
        noise: &mut N,
    ) -> Result<ForecastReport> {
        info!(
            "Building forecast report from {} transaction(s) over {} period(s)",
            transactions.len(),
            periods
        );

        let monthly = prepare_monthly(transactions);
        let forecast = self.forecaster.simple_forecast(&monthly, periods, noise);
        let mut stats = category_stats(transactions);
        stats.retain(|category, stat| {
            let undefined = stat.count > 0 && stat.mean == 0.0;
            if undefined {
                warn!(
                    "Leaving '{}' out of the category forecast: all {} expense(s) are zero",
                    category, stat.count
                );
            }
            !undefined
        });
        let category_forecast = self.forecaster.category_forecast(&stats, periods, noise)?;

        debug!(
            "Forecast report: {} month(s) of history, {} forecast point(s), {} category forecast(s)",
            monthly.len(),
            forecast.len(),
            category_forecast.len()
        );

        Ok(ForecastReport {
            monthly,
            forecast,
            category_forecast,
        })
    }

    pub fn insights(&self, transactions: &[Transaction]) -> Vec<Insight> {
        self.advisor.analyze_spending_patterns(transactions)
    }

    pub fn budget_plan(&self, transactions: &[Transaction], income: f64) -> BudgetPlan {
        self.advisor
            .generate_budget_recommendations(transactions, income)
    }

    pub fn chat(&self, message: &str, transactions: &[Transaction]) -> String {
        respond(message, &summarize(transactions))
    }
}
