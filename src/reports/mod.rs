//! Reports module
//!
//! Period-based reporting over a user's income and expense logs.

pub mod period_summary;

pub use period_summary::{IncomeStatus, PeriodSummary};
