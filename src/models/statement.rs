//! Bank account statements
//!
//! A statement is a batch of expenses reported by one bank account. It is
//! resolved to the category linked to that account and replayed through the
//! waterfall.

use serde::{Deserialize, Serialize};

use super::category::BankAccount;
use crate::error::LedgerResult;
use super::ids::StatementId;
use super::money::{Currency, Money};
use super::transaction::Transaction;

/// Batch of expenses from one bank account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatement {
    pub id: StatementId,
    pub bank_account: BankAccount,
    #[serde(default)]
    pub expenses: Vec<Transaction>,
}

impl AccountStatement {
    pub fn new(bank_account: BankAccount, expenses: Vec<Transaction>) -> Self {
        Self {
            id: StatementId::new(),
            bank_account,
            expenses,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total spent across the statement's expenses, by magnitude
    pub fn total(&self, currency: &Currency) -> LedgerResult<Money> {
        self.expenses
            .iter()
            .try_fold(Money::zero(currency.clone()), |acc, e| {
                acc.checked_add(&e.magnitude())
            })
    }
}

/// Flat statement line as exchanged with external tools
///
/// Amounts are in minor units (cents). Empty identifiers and zero amounts are
/// left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bank_id: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub amount: i64,
}

fn is_zero(amount: &i64) -> bool {
    *amount == 0
}
