//! Core data models for the ledger
//!
//! This module contains the budgeting domain: money, categories, allocation
//! rules, transactions, periods, statements and the user ledger that ties
//! them together.

pub mod allocation;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod statement;
pub mod transaction;
pub mod user;

pub use allocation::{AllocationKind, AllocationOutcome, AllocationRule, CategoryCredit};
pub use category::{BankAccount, Category, CategoryKind};
pub use ids::{StatementId, TransactionId};
pub use money::{Currency, Money};
pub use period::Period;
pub use statement::{AccountStatement, StatementRecord};
pub use transaction::{CategoryDraw, Transaction};
pub use user::{DeductionPolicy, StatementOutcome, User};
