//! Custom error types for arus
//!
//! This module defines the error hierarchy for the ledger using thiserror.
//! Every condition is local and recoverable by the caller.

use thiserror::Error;

/// The main error type for ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and inputs
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Income allocation requested before any rule was configured
    #[error("User does not have an allocation planned")]
    NoAllocationPlanned,

    /// Rule percentages add up to more than 100%
    #[error("Total allocation percentages exceed 100%: {total}")]
    PercentageOverflow { total: String },

    /// Fixed-amount rules claim more than the incoming funds
    #[error("Fixed allocations of {fixed} exceed income of {income}")]
    AllocationExceedsIncome { fixed: String, income: String },

    /// A rule (or lookup) names a category the user does not have
    #[error("Category does not exist: {0}")]
    UnknownCategory(String),

    /// A single category cannot cover a debit
    #[error("Insufficient funds in category '{category}': need {needed}, have {available}")]
    InsufficientFunds {
        category: String,
        needed: String,
        available: String,
    },

    /// The waterfall ran out of categories before covering the expense
    #[error("Insufficient funds across all categories: need {needed}, covered {covered}")]
    InsufficientFundsAcrossCategories { needed: String, covered: String },

    /// A statement names a bank account no category is linked to
    #[error("No category associated with bank account {account_number} at {bank_name}")]
    UnknownBankAccount {
        account_number: String,
        bank_name: String,
    },

    /// Arithmetic between two different currencies
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    /// Statement import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::user_not_found("user123");
        assert_eq!(err.to_string(), "User not found: user123");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_insufficient_funds_error() {
        let err = LedgerError::InsufficientFunds {
            category: "Expense".into(),
            needed: "50.00 USD".into(),
            available: "30.00 USD".into(),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds in category 'Expense': need 50.00 USD, have 30.00 USD"
        );
    }

    #[test]
    fn test_unknown_bank_account_error() {
        let err = LedgerError::UnknownBankAccount {
            account_number: "XYZ999".into(),
            bank_name: "Nowhere Bank".into(),
        };
        assert_eq!(
            err.to_string(),
            "No category associated with bank account XYZ999 at Nowhere Bank"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
