//! Transaction model
//!
//! Incomes and expenses are recorded as transactions in two append-only logs
//! on the user. A transaction is never edited once it has been appended.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryKind;
use super::ids::TransactionId;
use super::money::Money;

/// Portion of an expense taken from one category by the waterfall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraw {
    pub category: CategoryKind,
    pub amount: Money,
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Expenses are recorded as the positive amount spent
    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    /// Categories the expense was drawn from, in waterfall order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub draws: Vec<CategoryDraw>,
}

impl Transaction {
    pub fn new(amount: Money, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            id: TransactionId::new(),
            amount,
            date,
            description: description.into(),
            draws: Vec::new(),
        }
    }

    /// An incoming payment
    pub fn income(amount: Money, date: NaiveDate, description: impl Into<String>) -> Self {
        Self::new(amount, date, description)
    }

    /// An outgoing payment; stored as the positive amount spent
    pub fn expense(amount: Money, date: NaiveDate, description: impl Into<String>) -> Self {
        Self::new(amount.abs(), date, description)
    }

    /// Amount the waterfall must cover
    ///
    /// Expenses written in the "negative income" convention are deducted by
    /// their magnitude.
    pub fn magnitude(&self) -> Money {
        self.amount.abs()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.amount)?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}
