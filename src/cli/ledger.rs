//! Income, expense and statement CLI commands

use clap::Args;
use std::fs::File;
use std::path::PathBuf;

use super::parse_date;
use crate::config::Settings;
use crate::display::{format_allocation, format_draws};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BankAccount, Money, Transaction};
use crate::services::FinanceService;
use crate::storage::UserRepository;

/// Arguments shared by `income` and `expense`
#[derive(Args)]
pub struct EntryArgs {
    /// User ID
    pub user: String,
    /// Amount (e.g. "1000" or "54.20")
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
    /// Date (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Description
    #[arg(short = 'm', long, default_value = "")]
    pub description: String,
}

/// Arguments for `statement`
#[derive(Args)]
pub struct StatementArgs {
    /// User ID
    pub user: String,
    /// Path to CSV export
    pub file: PathBuf,
    /// Account number the statement belongs to
    #[arg(short, long)]
    pub account: String,
    /// Bank name the statement belongs to
    #[arg(short, long)]
    pub bank: String,
}

fn parse_entry<R: UserRepository + ?Sized>(
    service: &FinanceService<'_, R>,
    settings: &Settings,
    args: &EntryArgs,
) -> LedgerResult<(Money, chrono::NaiveDate)> {
    let currency = service.get_user(&args.user)?.currency;
    let amount = Money::parse(&args.amount, currency)?;
    let date = parse_date(args.date.as_deref(), &settings.date_format)?;
    Ok((amount, date))
}

/// Record an income and allocate it
pub fn handle_income<R: UserRepository + ?Sized>(
    service: &FinanceService<'_, R>,
    settings: &Settings,
    args: EntryArgs,
) -> LedgerResult<()> {
    let (amount, date) = parse_entry(service, settings, &args)?;
    let outcome = service.allocate_income(&args.user, amount, date, &args.description)?;
    print!("{}", format_allocation(&outcome));
    Ok(())
}

/// Record an expense and deduct it through the waterfall
pub fn handle_expense<R: UserRepository + ?Sized>(
    service: &FinanceService<'_, R>,
    settings: &Settings,
    args: EntryArgs,
) -> LedgerResult<()> {
    let (amount, date) = parse_entry(service, settings, &args)?;
    let expense = Transaction::expense(amount, date, args.description.as_str());
    let draws = service.process_expense(&args.user, expense)?;
    println!("Deducted from:");
    print!("{}", format_draws(&draws));
    Ok(())
}

/// Import a CSV statement and replay it
pub fn handle_statement<R: UserRepository + ?Sized>(
    service: &FinanceService<'_, R>,
    args: StatementArgs,
) -> LedgerResult<()> {
    let file = File::open(&args.file).map_err(|e| {
        LedgerError::Import(format!("Failed to open {}: {}", args.file.display(), e))
    })?;
    let bank_account = BankAccount::new(args.account, args.bank);

    let outcome = service.import_statement_csv(&args.user, file, bank_account)?;
    println!(
        "Processed {} expense(s) totalling {} from the {} account",
        outcome.processed, outcome.total, outcome.category
    );
    Ok(())
}
