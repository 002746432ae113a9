//! Reporting periods
//!
//! A period is an inclusive date range. Transactions dated on either boundary
//! belong to the period.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LedgerError, LedgerResult};

/// Inclusive date range used to bucket transactions for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Period {
    /// Create a custom period; `start` must not be after `end`
    pub fn custom(start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        if start > end {
            return Err(LedgerError::Validation(format!(
                "Period start {} is after end {}",
                start, end
            )));
        }
        Ok(Self {
            start_date: start,
            end_date: end,
        })
    }

    /// The calendar month `month` of `year`, first to last day
    pub fn monthly(year: i32, month: u32) -> LedgerResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| LedgerError::Validation(format!("Invalid month: {}-{}", year, month)))?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| LedgerError::Validation(format!("Invalid month: {}-{}", year, month)))?;

        Ok(Self {
            start_date: start,
            end_date: next_month - Duration::days(1),
        })
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = Self::monthly(date.year(), date.month())
            .map(|p| p.end_date)
            .unwrap_or(date);
        Self {
            start_date: start,
            end_date: end,
        }
    }

    /// Check if a date falls within this period (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Parse a period string
    ///
    /// Formats:
    /// - Monthly: "2023-09"
    /// - Custom: "2023-09-01..2023-09-15"
    pub fn parse(s: &str) -> LedgerResult<Self> {
        let s = s.trim();
        let invalid = || LedgerError::Validation(format!("Invalid period format: {}", s));

        if let Some((start, end)) = s.split_once("..") {
            let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
            let end = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
            return Self::custom(start, end);
        }

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::monthly(year, month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}
