use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Invalid transaction: field '{field}' {details}")]
    ValidationError { field: String, details: String },

    #[error("Division by zero while computing {context}")]
    DivisionByZero { context: String },

    #[error("Invalid noise ratio {0}: must be between 0.0 and 1.0")]
    InvalidNoiseRatio(f64),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Invalid keyword pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FinanceError {
    pub fn missing(field: &str) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            details: "is required".to_string(),
        }
    }

    pub fn invalid(field: &str, details: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinanceError>;
