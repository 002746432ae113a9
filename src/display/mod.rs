//! Display formatting for terminal output
//!
//! Renders ledgers and reports as tables for the CLI.

pub mod ledger;
pub mod report;

pub use ledger::{format_allocation, format_draws, format_rules, format_user};
pub use report::format_period_summary;
