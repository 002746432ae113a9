//! arus - personal budgeting ledger
//!
//! Each user has three categories (Expense, Emergency, Savings). Incomes are
//! split across them by allocation rules: fixed amounts first, then
//! percentages of what remains. Expenses are paid through a waterfall that
//! drains Expense, then Emergency, then Savings.
//!
//! # Architecture
//!
//! - `config`: Path and settings management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Money, categories, rules, transactions and the user ledger
//! - `storage`: User repositories (in-memory and JSON file)
//! - `services`: Repository-backed operations and statement import
//! - `reports`: Period summaries and income status
//! - `display`: Table rendering for the CLI
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust
//! use arus::models::{AllocationRule, CategoryKind, Money, Transaction, User};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let mut user = User::new("user123");
//! user.set_allocation_rules(vec![
//!     AllocationRule::percentage(CategoryKind::Expense, dec!(0.5)),
//!     AllocationRule::percentage(CategoryKind::Emergency, dec!(0.3)),
//!     AllocationRule::percentage(CategoryKind::Savings, dec!(0.2)),
//! ])?;
//!
//! let date = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
//! user.allocate_income(Money::new(dec!(1000), "USD"), date, "Salary")?;
//! user.process_expense(Transaction::expense(Money::new(dec!(900), "USD"), date, "Car Repair"))?;
//!
//! assert_eq!(user.balance(CategoryKind::Savings)?.amount, dec!(100));
//! # Ok::<(), arus::LedgerError>(())
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
