//! Report display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::LedgerResult;
use crate::models::{CategoryKind, Transaction};
use crate::reports::{IncomeStatus, PeriodSummary};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Drawn From")]
    drawn_from: String,
}

fn transaction_rows(transactions: &[Transaction], date_format: &str) -> Vec<TransactionRow> {
    transactions
        .iter()
        .map(|t| TransactionRow {
            date: t.date.format(date_format).to_string(),
            description: t.description.clone(),
            amount: t.amount.to_string(),
            drawn_from: t
                .draws
                .iter()
                .map(|d| format!("{} {}", d.category, d.amount))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

fn section(title: &str, transactions: &[Transaction], date_format: &str) -> String {
    if transactions.is_empty() {
        return format!("{}: none\n", title);
    }
    let table = Table::new(transaction_rows(transactions, date_format))
        .with(Style::modern())
        .to_string();
    format!("{}:\n{}\n", title, table)
}

/// Format a period summary with its income status
pub fn format_period_summary(
    summary: &PeriodSummary,
    status: &IncomeStatus,
    date_format: &str,
) -> LedgerResult<String> {
    let mut output = String::new();

    output.push_str(&format!("Period: {}\n\n", summary.period));
    output.push_str(&section("Incomes", &summary.incomes, date_format));
    output.push('\n');
    output.push_str(&section("Expenses", &summary.expenses, date_format));
    output.push('\n');

    output.push_str(&format!("Total income:  {}\n", summary.total_income));
    output.push_str(&format!("Total expense: {}\n", summary.total_expense));
    output.push_str(&format!("Net:           {}\n", summary.net()?));

    for kind in [CategoryKind::Emergency, CategoryKind::Savings] {
        let drawn = summary.drawn_from(kind);
        if drawn.is_positive() {
            output.push_str(&format!("Drawn from {}: {}\n", kind, drawn));
        }
    }

    output.push('\n');
    output.push_str(&status.to_string());
    output.push('\n');
    Ok(output)
}
