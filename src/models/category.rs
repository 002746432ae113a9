//! Spending categories
//!
//! A user owns exactly one category of each [`CategoryKind`]. Each category
//! holds a balance and the bank account that funds it. Credits and debits are
//! the only ways a balance changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::{Currency, Money};
use crate::error::{LedgerError, LedgerResult};

/// The closed set of category kinds
///
/// Variant order matches [`CategoryKind::WATERFALL`], so ordered maps keyed by
/// kind iterate in deduction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    /// Operating buffer, spent first
    Expense,
    /// Emergency reserve
    Emergency,
    /// Long-term savings, spent last
    Savings,
}

impl CategoryKind {
    /// Priority order used when deducting expenses
    pub const WATERFALL: [CategoryKind; 3] = [Self::Expense, Self::Emergency, Self::Savings];

    /// All kinds, in waterfall order
    pub fn all() -> &'static [Self] {
        &Self::WATERFALL
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Emergency => "Emergency",
            Self::Savings => "Savings",
        }
    }

    /// Emergency and Savings are reserves: touched only once Expense is empty
    pub fn is_reserve(&self) -> bool {
        !matches!(self, Self::Expense)
    }

    /// Bank account every new user's category starts linked to
    pub fn starter_bank_account(&self) -> BankAccount {
        match self {
            Self::Expense => BankAccount::new("EXP123", "Expense Bank"),
            Self::Emergency => BankAccount::new("EMG123", "Emergency Bank"),
            Self::Savings => BankAccount::new("SAV123", "Savings Bank"),
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CategoryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "emergency" => Ok(Self::Emergency),
            "savings" | "saving" => Ok(Self::Savings),
            _ => Err(LedgerError::UnknownCategory(s.trim().to_string())),
        }
    }
}

/// The bank account a category's funds live in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankAccount {
    pub account_number: String,
    pub bank_name: String,
}

impl BankAccount {
    pub fn new(account_number: impl Into<String>, bank_name: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            bank_name: bank_name.into(),
        }
    }
}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.account_number, self.bank_name)
    }
}

/// A user's category: a balance plus its funding account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub kind: CategoryKind,
    pub balance: Money,
    pub bank_account: BankAccount,
}

impl Category {
    /// Create an empty category linked to its starter bank account
    pub fn new(kind: CategoryKind, currency: Currency) -> Self {
        Self {
            kind,
            balance: Money::zero(currency),
            bank_account: kind.starter_bank_account(),
        }
    }

    pub fn currency(&self) -> &Currency {
        &self.balance.currency
    }

    /// Add funds to the category
    ///
    /// The balance is untouched if the amount is in another currency or the
    /// sum would overflow.
    pub fn credit(&mut self, amount: &Money) -> LedgerResult<()> {
        self.balance = self.balance.checked_add(amount)?;
        Ok(())
    }

    /// Remove funds from the category
    ///
    /// Fails with `InsufficientFunds` when the balance is smaller than
    /// `amount`; the balance is untouched on failure.
    pub fn debit(&mut self, amount: &Money) -> LedgerResult<()> {
        if amount.is_negative() {
            return Err(LedgerError::Validation(format!(
                "Cannot debit a negative amount ({}) from {}",
                amount, self.kind
            )));
        }

        let remaining = self.balance.checked_sub(amount)?;
        if remaining.is_negative() {
            return Err(LedgerError::InsufficientFunds {
                category: self.kind.to_string(),
                needed: amount.to_string(),
                available: self.balance.to_string(),
            });
        }

        self.balance = remaining;
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
