//! Canned advisor replies selected by keyword.
//!
//! Rules are checked in declaration order against the lower-cased message and the
//! first rule with a matching trigger renders the reply.

use crate::currency::{CurrencyFormatter, RupeeFormatter};
use crate::schema::FinancialSummary;
use log::debug;
use serde::{Deserialize, Serialize};

const EXPENSE_CEILING_SHARE: f64 = 0.7;
const LARGE_SAVINGS_THRESHOLD: f64 = 10000.0;
const SIP_SHARE: f64 = 0.6;
const PPF_SHARE: f64 = 0.3;
const PPF_MONTHLY_LIMIT: f64 = 12500.0;
const EMERGENCY_FUND_SHARE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    Budget,
    Savings,
    Investment,
    Expenses,
    Help,
}

type Render = fn(&FinancialSummary, &dyn CurrencyFormatter) -> String;

struct ChatRule {
    intent: ChatIntent,
    triggers: &'static [&'static str],
    render: Render,
}

const RULES: &[ChatRule] = &[
    ChatRule {
        intent: ChatIntent::Budget,
        triggers: &["budget"],
        render: budget_reply,
    },
    ChatRule {
        intent: ChatIntent::Savings,
        triggers: &["save", "saving"],
        render: savings_reply,
    },
    ChatRule {
        intent: ChatIntent::Investment,
        triggers: &["invest"],
        render: investment_reply,
    },
    ChatRule {
        intent: ChatIntent::Expenses,
        triggers: &["expense", "spending"],
        render: expenses_reply,
    },
];

const HELP_REPLY: &str = "I'm here to help with your finances! Ask me about budgeting, saving, investing, or expense analysis. You can also ask specific questions like 'How can I save more?' or 'What should my budget be?'";

fn matching_rule(message: &str) -> Option<&'static ChatRule> {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.triggers.iter().any(|t| lowered.contains(t)))
}

/// Which reply a message would get.
pub fn classify(message: &str) -> ChatIntent {
    matching_rule(message)
        .map(|rule| rule.intent)
        .unwrap_or(ChatIntent::Help)
}

pub struct ChatResponder<F: CurrencyFormatter = RupeeFormatter> {
    formatter: F,
}

impl Default for ChatResponder<RupeeFormatter> {
    fn default() -> Self {
        Self {
            formatter: RupeeFormatter,
        }
    }
}

impl<F: CurrencyFormatter> ChatResponder<F> {
    pub fn with_formatter(formatter: F) -> Self {
        Self { formatter }
    }

    pub fn respond(&self, message: &str, summary: &FinancialSummary) -> String {
        match matching_rule(message) {
            Some(rule) => {
                debug!("Chat message matched {:?} rule", rule.intent);
                (rule.render)(summary, &self.formatter)
            }
            None => HELP_REPLY.to_string(),
        }
    }
}

/// Reply using rupee formatting.
pub fn respond(message: &str, summary: &FinancialSummary) -> String {
    ChatResponder::default().respond(message, summary)
}

fn budget_reply(summary: &FinancialSummary, fmt: &dyn CurrencyFormatter) -> String {
    if summary.total_income > 0.0 {
        let ceiling = summary.total_income * EXPENSE_CEILING_SHARE;
        format!(
            "Based on your income of {}, I recommend keeping monthly expenses under {}. You're currently spending {}.",
            fmt.format(summary.total_income),
            fmt.format(ceiling),
            fmt.format(summary.total_expenses)
        )
    } else {
        "To create a budget, I need to know your monthly income. Could you add some income transactions first?".to_string()
    }
}

fn savings_reply(summary: &FinancialSummary, fmt: &dyn CurrencyFormatter) -> String {
    let rate = summary.savings_rate;
    if rate >= 20.0 {
        format!(
            "Excellent! You're saving {:.1}% of your income. Consider investing the surplus in mutual funds or SIPs for better returns.",
            rate
        )
    } else if rate >= 10.0 {
        format!(
            "Good job! You're saving {:.1}% of your income. Try to increase it to 20% by reducing discretionary expenses.",
            rate
        )
    } else if rate > 0.0 {
        format!(
            "Your savings rate is {:.1}%. I recommend targeting at least 20%. Start by tracking your expenses and identifying areas to cut back.",
            rate
        )
    } else {
        format!(
            "I notice you're not saving much. Start with the 50/30/20 rule: 50% needs, 30% wants, 20% savings. Even saving {} monthly makes a difference!",
            fmt.format(1000.0)
        )
    }
}

fn investment_reply(summary: &FinancialSummary, fmt: &dyn CurrencyFormatter) -> String {
    let monthly_savings = (summary.total_income - summary.total_expenses).max(0.0);

    if monthly_savings > LARGE_SAVINGS_THRESHOLD {
        format!(
            "With {} monthly savings, consider: 1) SIP in diversified mutual funds ({}), 2) PPF for tax savings ({}), 3) Emergency fund ({})",
            fmt.format(monthly_savings),
            fmt.format(monthly_savings * SIP_SHARE),
            fmt.format((monthly_savings * PPF_SHARE).min(PPF_MONTHLY_LIMIT)),
            fmt.format(monthly_savings * EMERGENCY_FUND_SHARE)
        )
    } else if monthly_savings > 0.0 {
        format!(
            "Start with a SIP of {} in a balanced mutual fund. Once you increase your savings, diversify into equity and debt funds.",
            fmt.format(monthly_savings)
        )
    } else {
        "Focus on increasing your savings first before investing. Create a budget and reduce unnecessary expenses.".to_string()
    }
}

fn expenses_reply(summary: &FinancialSummary, fmt: &dyn CurrencyFormatter) -> String {
    let top = summary
        .category_breakdown
        .iter()
        .fold(None::<(&String, f64)>, |best, (category, &amount)| match best {
            Some((_, best_amount)) if best_amount >= amount => best,
            _ => Some((category, amount)),
        });

    match top {
        Some((category, amount)) => format!(
            "Your highest expense category is {} at {}. Consider reviewing these expenses for potential savings.",
            category,
            fmt.format(amount)
        ),
        None => "I need more transaction data to analyze your spending patterns. Add some expenses to get personalized insights!".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::SymbolFormatter;
    use std::collections::BTreeMap;

    fn summary(income: f64, expenses: f64, rate: f64) -> FinancialSummary {
        FinancialSummary {
            total_income: income,
            total_expenses: expenses,
            net_savings: income - expenses,
            savings_rate: rate,
            category_breakdown: BTreeMap::new(),
        }
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(classify("What should my budget be?"), ChatIntent::Budget);
        assert_eq!(classify("How can I save more?"), ChatIntent::Savings);
        assert_eq!(classify("Saving tips"), ChatIntent::Savings);
        assert_eq!(classify("Where should I INVEST?"), ChatIntent::Investment);
        assert_eq!(classify("Show my expenses"), ChatIntent::Expenses);
        assert_eq!(classify("spending report"), ChatIntent::Expenses);
        assert_eq!(classify("hello"), ChatIntent::Help);

        // Earlier rules win when several triggers are present.
        assert_eq!(classify("budget to save and invest"), ChatIntent::Budget);
        assert_eq!(classify("save on expenses"), ChatIntent::Savings);
        assert_eq!(classify("invest less, spending more"), ChatIntent::Investment);
    }

    #[test]
    fn test_save_message_uses_top_savings_tier() {
        let reply = respond("How can I save more?", &summary(100000.0, 50000.0, 50.0));
        assert_eq!(
            reply,
            "Excellent! You're saving 50.0% of your income. Consider investing the surplus in mutual funds or SIPs for better returns."
        );
    }

    #[test]
    fn test_savings_tiers() {
        assert!(respond("save", &summary(0.0, 0.0, 20.0)).starts_with("Excellent!"));
        assert!(respond("save", &summary(0.0, 0.0, 12.34)).starts_with("Good job! You're saving 12.3%"));
        assert!(respond("save", &summary(0.0, 0.0, 5.0)).starts_with("Your savings rate is 5.0%"));
        assert_eq!(
            respond("save", &summary(0.0, 0.0, 0.0)),
            "I notice you're not saving much. Start with the 50/30/20 rule: 50% needs, 30% wants, 20% savings. Even saving ₹1,000 monthly makes a difference!"
        );
        assert!(respond("save", &summary(0.0, 0.0, -15.0)).starts_with("I notice"));
    }

    #[test]
    fn test_budget_reply() {
        assert_eq!(
            respond("budget", &summary(100000.0, 45000.0, 55.0)),
            "Based on your income of ₹100,000, I recommend keeping monthly expenses under ₹70,000. You're currently spending ₹45,000."
        );
        assert!(respond("budget", &summary(0.0, 45000.0, 0.0)).starts_with("To create a budget"));
    }

    #[test]
    fn test_investment_tiers() {
        assert_eq!(
            respond("invest", &summary(100000.0, 40000.0, 60.0)),
            "With ₹60,000 monthly savings, consider: 1) SIP in diversified mutual funds (₹36,000), 2) PPF for tax savings (₹12,500), 3) Emergency fund (₹6,000)"
        );
        assert_eq!(
            respond("invest", &summary(30000.0, 10000.0, 66.0)),
            "With ₹20,000 monthly savings, consider: 1) SIP in diversified mutual funds (₹12,000), 2) PPF for tax savings (₹6,000), 3) Emergency fund (₹2,000)"
        );
        assert!(respond("invest", &summary(15000.0, 10000.0, 33.0))
            .starts_with("Start with a SIP of ₹5,000"));
        assert!(respond("invest", &summary(10000.0, 15000.0, -50.0))
            .starts_with("Focus on increasing your savings"));
    }

    #[test]
    fn test_expenses_reply_names_top_category() {
        let mut metrics = summary(100000.0, 30000.0, 70.0);
        metrics
            .category_breakdown
            .insert("Food & Dining".to_string(), 9995.0);
        metrics
            .category_breakdown
            .insert("Bills & Utilities".to_string(), 12000.0);
        metrics
            .category_breakdown
            .insert("Shopping".to_string(), 8005.0);

        assert_eq!(
            respond("What are my biggest expenses?", &metrics),
            "Your highest expense category is Bills & Utilities at ₹12,000. Consider reviewing these expenses for potential savings."
        );

        assert!(respond("spending", &summary(0.0, 0.0, 0.0)).starts_with("I need more transaction data"));
    }

    #[test]
    fn test_help_reply() {
        assert_eq!(respond("hi there", &FinancialSummary::default()), HELP_REPLY);
    }

    #[test]
    fn test_custom_formatter() {
        let responder = ChatResponder::with_formatter(SymbolFormatter {
            symbol: "$".to_string(),
            decimals: 2,
        });

        let reply = responder.respond("invest", &summary(15000.0, 10000.0, 33.0));
        assert!(reply.starts_with("Start with a SIP of $5,000.00"));
    }
}
