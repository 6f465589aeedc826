use crate::utils::MonthKey;
use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[schemars(description = "Money received (salary, freelance payments, refunds)")]
    Income,

    #[schemars(
        description = "Money spent. The amount may be stored negative or positive; it is always aggregated as a magnitude."
    )]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Transaction {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub transaction_type: TransactionType,
    pub date: NaiveDateTime,
}

impl Transaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        transaction_type: TransactionType,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            transaction_type,
            date,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    /// Amount as it contributes to aggregates: expenses are always magnitudes.
    pub fn normalized_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Expense => self.amount.abs(),
            TransactionType::Income => self.amount,
        }
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(&self.date)
    }
}

/// The closed set of spending categories the categorizer can assign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Investment")]
    Investment,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::FoodAndDining,
        Category::Transportation,
        Category::Shopping,
        Category::BillsAndUtilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Education,
        Category::Investment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::BillsAndUtilities => "Bills & Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Investment => "Investment",
            Category::Other => "Other",
        }
    }

    /// Categories budgeted out of the "needs" share of income.
    pub fn is_essential(&self) -> bool {
        matches!(
            self,
            Category::BillsAndUtilities
                | Category::FoodAndDining
                | Category::Transportation
                | Category::Healthcare
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct MonthlyAggregate {
    pub month: MonthKey,
    pub expenses: f64,
    pub income: f64,
    /// `income - expenses`; negative when the month overspent.
    pub savings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CategoryStat {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ForecastPoint {
    #[serde(rename = "period")]
    pub period_label: String,
    pub predicted_expenses: f64,
    pub predicted_income: f64,
    pub predicted_savings: f64,
    pub confidence: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CategoryForecast {
    pub category: String,
    pub current_avg: f64,
    pub predicted_amount: f64,
    pub change_percent: f64,
    pub confidence: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    SpendingAnalysis,
    Recommendation,
    Alert,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub message: String,
    pub confidence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct BudgetRecommendation {
    pub category: String,
    pub current_avg: f64,
    pub recommended_budget: f64,
    /// `recommended_budget - current_avg`
    pub difference: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct BudgetPlan {
    pub total_recommended_expenses: f64,
    pub savings_target: f64,
    pub recommendations: Vec<BudgetRecommendation>,
}

/// Headline figures over a transaction batch. This is also the metrics snapshot
/// the chat responder reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    #[serde(default)]
    pub net_savings: f64,
    pub savings_rate: f64,
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CategorizationResult {
    pub category: Category,
    pub confidence: f64,
    pub is_ai_categorized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_category_round_trips_through_label() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("Groceries".parse::<Category>().is_err());

        let json = serde_json::to_string(&Category::BillsAndUtilities).unwrap();
        assert_eq!(json, "\"Bills & Utilities\"");
    }

    #[test]
    fn test_expense_amount_is_normalized_to_magnitude() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let stored_negative =
            Transaction::new("Petrol Pump", -4520.0, "Transportation", TransactionType::Expense, date);
        let stored_positive =
            Transaction::new("Petrol Pump", 4520.0, "Transportation", TransactionType::Expense, date);

        assert_eq!(stored_negative.normalized_amount(), 4520.0);
        assert_eq!(stored_positive.normalized_amount(), 4520.0);
        assert_eq!(stored_negative.month(), MonthKey::new(2024, 3).unwrap());
    }

    #[test]
    fn test_forecast_point_serializes_period_label() {
        let point = ForecastPoint {
            period_label: "Month +1".to_string(),
            predicted_expenses: 115.0,
            predicted_income: 215.0,
            predicted_savings: 100.0,
            confidence: 90,
        };

        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["period"], "Month +1");
        assert_eq!(json["confidence"], 90);
    }

    #[test]
    fn test_insight_omits_empty_payload() {
        let insight = Insight {
            insight_type: InsightType::Alert,
            title: "High Spending Alert".to_string(),
            message: "msg".to_string(),
            confidence: 80,
            category: None,
            amount: None,
            percentage: None,
        };

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "alert");
        assert!(json.get("category").is_none());
        assert!(json.get("amount").is_none());
    }
}
