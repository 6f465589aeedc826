use crate::aggregator::{category_stats, category_totals};
use crate::config::{BudgetSettings, InsightSettings};
use crate::currency::{CurrencyFormatter, RupeeFormatter};
use crate::schema::{BudgetPlan, BudgetRecommendation, Category, Insight, InsightType, Transaction};
use crate::utils::percentage_of;
use log::debug;
use std::collections::BTreeMap;

const TOP_CATEGORY_CONFIDENCE: u32 = 95;
const SAVINGS_OPPORTUNITY_CONFIDENCE: u32 = 85;
const HIGH_SPENDING_CONFIDENCE: u32 = 80;

/// Spending insights and budget recommendations derived from a transaction batch.
pub struct Advisor<F: CurrencyFormatter = RupeeFormatter> {
    budget: BudgetSettings,
    insights: InsightSettings,
    formatter: F,
}

impl Default for Advisor<RupeeFormatter> {
    fn default() -> Self {
        Self::new(BudgetSettings::default(), InsightSettings::default())
    }
}

impl Advisor<RupeeFormatter> {
    pub fn new(budget: BudgetSettings, insights: InsightSettings) -> Self {
        Self {
            budget,
            insights,
            formatter: RupeeFormatter,
        }
    }
}

impl<F: CurrencyFormatter> Advisor<F> {
    pub fn with_formatter<G: CurrencyFormatter>(self, formatter: G) -> Advisor<G> {
        Advisor {
            budget: self.budget,
            insights: self.insights,
            formatter,
        }
    }

    /// Names the top spending category and, when it dominates, suggests cutting it back.
    pub fn analyze_spending_patterns(&self, transactions: &[Transaction]) -> Vec<Insight> {
        let totals = category_totals(transactions);
        let Some((top_category, top_amount, top_share)) = top_category(&totals) else {
            return Vec::new();
        };

        let mut insights = vec![Insight {
            insight_type: InsightType::SpendingAnalysis,
            title: "Top Spending Category".to_string(),
            message: format!(
                "You spend most on {} ({}, {:.1}% of total expenses)",
                top_category,
                self.formatter.format(top_amount),
                top_share
            ),
            confidence: TOP_CATEGORY_CONFIDENCE,
            category: Some(top_category.clone()),
            amount: Some(top_amount),
            percentage: None,
        }];

        if top_share > self.insights.recommendation_threshold {
            let potential_savings = top_amount * self.insights.reduction_ratio;
            insights.push(Insight {
                insight_type: InsightType::Recommendation,
                title: "Savings Opportunity".to_string(),
                message: format!(
                    "Reducing {} expenses by {:.0}% could save you {} monthly",
                    top_category,
                    self.insights.reduction_ratio * 100.0,
                    self.formatter.format(potential_savings)
                ),
                confidence: SAVINGS_OPPORTUNITY_CONFIDENCE,
                category: Some(top_category),
                amount: Some(potential_savings),
                percentage: None,
            });
        }

        debug!("Generated {} spending insight(s)", insights.len());
        insights
    }

    /// Top category with its share of spending, plus an alert when the share is too high.
    pub fn spending_insights(&self, transactions: &[Transaction]) -> Vec<Insight> {
        let totals = category_totals(transactions);
        let Some((top_category, top_amount, top_share)) = top_category(&totals) else {
            return Vec::new();
        };

        let mut insights = vec![Insight {
            insight_type: InsightType::SpendingAnalysis,
            title: format!("Top Spending Category: {}", top_category),
            message: format!(
                "You spent {} ({:.1}%) on {} this month.",
                self.formatter.format(top_amount),
                top_share,
                top_category
            ),
            confidence: TOP_CATEGORY_CONFIDENCE,
            category: Some(top_category.clone()),
            amount: Some(top_amount),
            percentage: Some(top_share),
        }];

        if top_share > self.insights.alert_threshold {
            insights.push(Insight {
                insight_type: InsightType::Alert,
                title: "High Spending Alert".to_string(),
                message: format!(
                    "Your {} expenses are {:.1}% of total spending. Consider reviewing this category.",
                    top_category, top_share
                ),
                confidence: HIGH_SPENDING_CONFIDENCE,
                category: Some(top_category),
                amount: None,
                percentage: Some(top_share),
            });
        }

        insights
    }

    /// Per-category budgets under the 50/30/20 rule.
    ///
    /// Essential categories are budgeted from the needs share with a larger buffer;
    /// everything else comes out of the wants share.
    pub fn generate_budget_recommendations(
        &self,
        transactions: &[Transaction],
        income: f64,
    ) -> BudgetPlan {
        if transactions.is_empty() {
            return BudgetPlan::default();
        }

        let needs_budget = income * self.budget.needs_share;
        let wants_budget = income * self.budget.wants_share;
        let savings_target = income * self.budget.savings_share;

        let recommendations: Vec<BudgetRecommendation> = category_stats(transactions)
            .into_iter()
            .map(|(category, stat)| {
                let essential = category
                    .parse::<Category>()
                    .map(|c| c.is_essential())
                    .unwrap_or(false);

                let recommended_budget = if essential {
                    (stat.mean * (1.0 + self.budget.essential_buffer))
                        .min(needs_budget * self.budget.essential_cap_share)
                } else {
                    (stat.mean * (1.0 + self.budget.discretionary_buffer))
                        .min(wants_budget * self.budget.discretionary_cap_share)
                };

                BudgetRecommendation {
                    category,
                    current_avg: stat.mean,
                    recommended_budget,
                    difference: recommended_budget - stat.mean,
                }
            })
            .collect();

        BudgetPlan {
            total_recommended_expenses: recommendations.iter().map(|r| r.recommended_budget).sum(),
            savings_target,
            recommendations,
        }
    }
}

/// Largest category by total, its amount and its share of all spending. Ties go to the
/// category that sorts first. `None` when nothing was spent.
fn top_category(totals: &BTreeMap<String, f64>) -> Option<(String, f64, f64)> {
    let total: f64 = totals.values().sum();
    if total <= 0.0 {
        return None;
    }

    let (category, amount) = totals
        .iter()
        .fold(None::<(&String, f64)>, |best, (category, &amount)| match best {
            Some((_, best_amount)) if best_amount >= amount => best,
            _ => Some((category, amount)),
        })?;

    Some((category.clone(), amount, percentage_of(amount, total)))
}
