//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod ledger;
pub mod report;
pub mod rules;
pub mod user;

use chrono::{Local, NaiveDate};

use crate::error::{LedgerError, LedgerResult};

pub use ledger::{handle_expense, handle_income, handle_statement, EntryArgs, StatementArgs};
pub use report::{handle_report, ReportArgs};
pub use rules::{handle_rules_command, RulesCommands};
pub use user::{handle_user_command, UserCommands};

/// Parse a `--date` value, defaulting to today
pub(crate) fn parse_date(value: Option<&str>, date_format: &str) -> LedgerResult<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s.trim(), date_format)
            .or_else(|_| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
            .map_err(|_| LedgerError::Validation(format!("Invalid date: {}", s))),
        None => Ok(Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2023, 9, 15).unwrap();
        assert_eq!(parse_date(Some("2023-09-15"), "%Y-%m-%d").unwrap(), expected);
        assert_eq!(parse_date(Some("15/09/2023"), "%d/%m/%Y").unwrap(), expected);
        // ISO dates are always accepted
        assert_eq!(parse_date(Some("2023-09-15"), "%d/%m/%Y").unwrap(), expected);
        assert!(parse_date(Some("yesterday"), "%Y-%m-%d").unwrap_err().is_validation());
    }
}
