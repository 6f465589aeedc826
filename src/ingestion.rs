use crate::categorizer::Categorizer;
use crate::error::{FinanceError, Result};
use crate::schema::{Transaction, TransactionType};
use chrono::NaiveDateTime;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A transaction as it arrives from the storage or request layer, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawTransaction {
    #[schemars(description = "Free-text description, e.g. 'Swiggy order' or 'Salary Deposit'")]
    pub description: Option<String>,

    #[schemars(description = "Signed amount. Expenses may be negative or positive.")]
    pub amount: Option<f64>,

    #[schemars(
        description = "Category label. When missing or blank, the categorizer assigns one from the description."
    )]
    #[serde(default)]
    pub category: Option<String>,

    #[schemars(description = "Either 'income' or 'expense'")]
    pub transaction_type: Option<String>,

    #[schemars(description = "Timestamp of the transaction (ISO 8601, no timezone)")]
    pub date: Option<NaiveDateTime>,
}

impl RawTransaction {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Vec<RawTransaction>)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Converts one raw record, categorizing it from its description when no category was given.
pub fn validate_transaction(raw: &RawTransaction, categorizer: &Categorizer) -> Result<Transaction> {
    let description = raw
        .description
        .clone()
        .ok_or_else(|| FinanceError::missing("description"))?;

    let amount = raw.amount.ok_or_else(|| FinanceError::missing("amount"))?;
    if !amount.is_finite() {
        return Err(FinanceError::invalid(
            "amount",
            format!("must be a finite number, got {}", amount),
        ));
    }

    let transaction_type: TransactionType = raw
        .transaction_type
        .as_deref()
        .ok_or_else(|| FinanceError::missing("transaction_type"))?
        .parse()
        .map_err(|e: String| FinanceError::invalid("transaction_type", e))?;

    let date = raw.date.ok_or_else(|| FinanceError::missing("date"))?;

    let category = match raw.category.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => {
            let assigned = categorizer.categorize(&description);
            debug!("Assigned category '{}' to '{}'", assigned, description);
            assigned.as_str().to_string()
        }
    };

    Ok(Transaction {
        description,
        amount,
        category,
        transaction_type,
        date,
    })
}

/// Validates a whole batch. The first malformed record fails the call.
pub fn validate_batch(raw: &[RawTransaction], categorizer: &Categorizer) -> Result<Vec<Transaction>> {
    raw.iter()
        .enumerate()
        .map(|(idx, record)| {
            validate_transaction(record, categorizer).map_err(|e| match e {
                FinanceError::ValidationError { field, details } => FinanceError::ValidationError {
                    field,
                    details: format!("{} (record #{})", details, idx),
                },
                other => other,
            })
        })
        .collect()
}
