//! Allocation rule CLI commands

use clap::Subcommand;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::display::format_rules;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AllocationRule, BankAccount, CategoryKind, Currency, Money};
use crate::services::FinanceService;
use crate::storage::UserRepository;

/// Rule subcommands
#[derive(Subcommand)]
pub enum RulesCommands {
    /// Replace a user's allocation rules
    Set {
        /// User ID
        user: String,
        /// Fixed amount taken off the top (e.g. "expense=200"); repeatable
        #[arg(long, value_name = "CATEGORY=AMOUNT")]
        fixed: Vec<String>,
        /// Share of what remains after fixed amounts (e.g. "savings=0.2" or "savings=20%"); repeatable
        #[arg(long, value_name = "CATEGORY=FRACTION")]
        percent: Vec<String>,
    },

    /// Show a user's allocation rules
    Show {
        /// User ID
        user: String,
    },

    /// Link a category to a bank account for statement import
    Link {
        /// User ID
        user: String,
        /// Category (expense, emergency, savings)
        category: String,
        /// Account number
        #[arg(short, long)]
        account: String,
        /// Bank name
        #[arg(short, long)]
        bank: String,
    },
}

/// Split "category=value"
fn split_assignment(arg: &str) -> LedgerResult<(CategoryKind, &str)> {
    let (category, value) = arg.split_once('=').ok_or_else(|| {
        LedgerError::Validation(format!("Expected CATEGORY=VALUE, got '{}'", arg))
    })?;
    Ok((category.trim().parse()?, value.trim()))
}

/// Parse a fraction, accepting "0.2" or "20%"
fn parse_fraction(value: &str) -> LedgerResult<Decimal> {
    let invalid = || LedgerError::Validation(format!("Invalid percentage: {}", value));
    match value.strip_suffix('%') {
        Some(percent) => Ok(Decimal::from_str(percent.trim()).map_err(|_| invalid())?
            / Decimal::ONE_HUNDRED),
        None => Decimal::from_str(value).map_err(|_| invalid()),
    }
}

/// Build rules from `--fixed` and `--percent` arguments, fixed first
pub fn parse_rules(
    fixed: &[String],
    percent: &[String],
    currency: &Currency,
) -> LedgerResult<Vec<AllocationRule>> {
    let mut rules = Vec::with_capacity(fixed.len() + percent.len());

    for arg in fixed {
        let (category, value) = split_assignment(arg)?;
        rules.push(AllocationRule::fixed(
            category,
            Money::parse(value, currency.clone())?,
        ));
    }
    for arg in percent {
        let (category, value) = split_assignment(arg)?;
        rules.push(AllocationRule::percentage(category, parse_fraction(value)?));
    }

    Ok(rules)
}

/// Handle a rules command
pub fn handle_rules_command<R: UserRepository + ?Sized>(
    service: &FinanceService<'_, R>,
    cmd: RulesCommands,
) -> LedgerResult<()> {
    match cmd {
        RulesCommands::Set {
            user,
            fixed,
            percent,
        } => {
            if fixed.is_empty() && percent.is_empty() {
                return Err(LedgerError::Validation(
                    "Provide at least one --fixed or --percent rule".into(),
                ));
            }
            let currency = service.get_user(&user)?.currency;
            let rules = parse_rules(&fixed, &percent, &currency)?;
            let updated = service.set_allocation_rules(&user, rules)?;
            println!("Allocation rules for {}:", updated.id);
            print!("{}", format_rules(&updated.allocation_rules));
        }

        RulesCommands::Show { user } => {
            let user = service.get_user(&user)?;
            print!("{}", format_rules(&user.allocation_rules));
        }

        RulesCommands::Link {
            user,
            category,
            account,
            bank,
        } => {
            let kind: CategoryKind = category.parse()?;
            let account = BankAccount::new(account, bank);
            service.link_bank_account(&user, kind, account.clone())?;
            println!("Linked {} to {}", kind, account);
        }
    }

    Ok(())
}
