//! Statement CSV import
//!
//! Reads a bank statement export into an [`AccountStatement`]. Columns are
//! located by header name (`date`, `description`, `amount`); files without a
//! recognisable header fall back to that column order.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountStatement, BankAccount, Currency, Money, Transaction};

/// Column positions within a statement row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: usize,
    pub description: Option<usize>,
    pub amount: usize,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: 0,
            description: Some(1),
            amount: 2,
        }
    }
}

impl ColumnMapping {
    /// Find columns by header name; `None` if date or amount is missing
    pub fn from_headers(headers: &StringRecord) -> Option<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };

        Some(Self {
            date: find(&["date", "posted", "transaction date"])?,
            description: find(&["description", "memo", "payee", "details"]),
            amount: find(&["amount", "debit", "value"])?,
        })
    }
}

/// Parses statement exports for one currency and date format
pub struct StatementImporter {
    currency: Currency,
    date_format: String,
}

impl StatementImporter {
    pub fn new(currency: Currency, date_format: impl Into<String>) -> Self {
        Self {
            currency,
            date_format: date_format.into(),
        }
    }

    /// Parse a CSV export into a statement for `bank_account`
    ///
    /// Every row becomes an expense. Amounts may be written negative (the
    /// usual debit convention); the magnitude is used. The first bad row
    /// fails the whole import.
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
        bank_account: BankAccount,
    ) -> LedgerResult<AccountStatement> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = csv_reader.records();
        let mut expenses = Vec::new();

        let first = match records.next() {
            Some(record) => record?,
            None => return Ok(AccountStatement::new(bank_account, expenses)),
        };

        let (mapping, header_row) = match ColumnMapping::from_headers(&first) {
            Some(mapping) => (mapping, true),
            None => (ColumnMapping::default(), false),
        };

        if !header_row {
            expenses.push(self.parse_record(&first, 1, &mapping)?);
        }

        for (idx, record) in records.enumerate() {
            let record = record?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            expenses.push(self.parse_record(&record, idx + 2, &mapping)?);
        }

        Ok(AccountStatement::new(bank_account, expenses))
    }

    fn parse_record(
        &self,
        record: &StringRecord,
        row: usize,
        mapping: &ColumnMapping,
    ) -> LedgerResult<Transaction> {
        let field = |col: usize, name: &str| {
            record
                .get(col)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| LedgerError::Import(format!("Row {}: missing {}", row, name)))
        };

        let date_str = field(mapping.date, "date")?;
        let date = NaiveDate::parse_from_str(date_str, &self.date_format).map_err(|_| {
            LedgerError::Import(format!("Row {}: invalid date '{}'", row, date_str))
        })?;

        let amount_str = field(mapping.amount, "amount")?;
        let amount = Money::parse(amount_str, self.currency.clone()).map_err(|_| {
            LedgerError::Import(format!("Row {}: invalid amount '{}'", row, amount_str))
        })?;

        let description = mapping
            .description
            .and_then(|col| record.get(col))
            .unwrap_or_default();

        Ok(Transaction::expense(amount, date, description))
    }
}
