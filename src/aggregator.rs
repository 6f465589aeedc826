use crate::schema::{CategoryStat, FinancialSummary, MonthlyAggregate, Transaction};
use crate::utils::{mean, percentage_of, sample_std_dev, MonthKey};
use log::debug;
use std::collections::BTreeMap;

/// Builds the monthly income/expense/savings series, ascending by month.
///
/// Rows exist only for months with at least one expense. Income is looked up per
/// expense month and defaults to 0, so a month with income but no expenses does not
/// appear in the output.
pub fn prepare_monthly(transactions: &[Transaction]) -> Vec<MonthlyAggregate> {
    if transactions.is_empty() {
        return Vec::new();
    }

    let mut monthly_expenses: BTreeMap<MonthKey, f64> = BTreeMap::new();
    let mut monthly_income: BTreeMap<MonthKey, f64> = BTreeMap::new();

    for tx in transactions {
        let bucket = if tx.is_expense() {
            &mut monthly_expenses
        } else {
            &mut monthly_income
        };
        *bucket.entry(tx.month()).or_insert(0.0) += tx.normalized_amount();
    }

    let dropped = monthly_income
        .keys()
        .filter(|m| !monthly_expenses.contains_key(m))
        .count();
    if dropped > 0 {
        debug!(
            "{} income-only month(s) have no expense activity and are left out of the monthly series",
            dropped
        );
    }

    monthly_expenses
        .into_iter()
        .map(|(month, expenses)| {
            let income = monthly_income.get(&month).copied().unwrap_or(0.0);
            MonthlyAggregate {
                month,
                expenses,
                income,
                savings: income - expenses,
            }
        })
        .collect()
}

/// Mean, sample standard deviation and count of expense magnitudes per category.
pub fn category_stats(transactions: &[Transaction]) -> BTreeMap<String, CategoryStat> {
    group_expenses(transactions)
        .into_iter()
        .map(|(category, amounts)| {
            let stat = CategoryStat {
                mean: mean(&amounts),
                std_dev: sample_std_dev(&amounts),
                count: amounts.len(),
            };
            (category, stat)
        })
        .collect()
}

/// Sum of expense magnitudes per category.
pub fn category_totals(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        *totals.entry(tx.category.clone()).or_insert(0.0) += tx.normalized_amount();
    }
    totals
}

pub fn summarize(transactions: &[Transaction]) -> FinancialSummary {
    let total_income: f64 = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum();
    let total_expenses: f64 = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.normalized_amount())
        .sum();
    let net_savings = total_income - total_expenses;

    FinancialSummary {
        total_income,
        total_expenses,
        net_savings,
        savings_rate: percentage_of(net_savings, total_income),
        category_breakdown: category_totals(transactions),
    }
}

fn group_expenses(transactions: &[Transaction]) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        groups
            .entry(tx.category.clone())
            .or_default()
            .push(tx.normalized_amount());
    }
    groups
}
