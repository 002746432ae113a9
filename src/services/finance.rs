//! Finance service
//!
//! Wraps the user ledger operations with repository access: fetch the user,
//! run the operation, save. A rejected operation that left the user untouched
//! is never saved. One that changed the user before failing (a partial
//! waterfall, or a statement that failed part-way) is saved so the stored
//! ledger matches what was applied.

use chrono::NaiveDate;
use std::io::Read;
use tracing::{info, warn};

use super::import::StatementImporter;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountStatement, AllocationOutcome, AllocationRule, BankAccount, CategoryDraw, CategoryKind,
    Currency, DeductionPolicy, Money, Period, StatementOutcome, Transaction, User,
};
use crate::reports::{IncomeStatus, PeriodSummary};
use crate::storage::UserRepository;

/// Service for ledger operations on stored users
pub struct FinanceService<'a, R: UserRepository + ?Sized> {
    repo: &'a R,
    policy: DeductionPolicy,
    default_currency: Currency,
    date_format: String,
}

impl<'a, R: UserRepository + ?Sized> FinanceService<'a, R> {
    /// Create a service with default settings
    pub fn new(repo: &'a R) -> Self {
        Self::with_settings(repo, &Settings::default())
    }

    /// Create a service using the policy, currency and date format from `settings`
    pub fn with_settings(repo: &'a R, settings: &Settings) -> Self {
        Self {
            repo,
            policy: settings.deduction_policy,
            default_currency: settings.default_currency.clone(),
            date_format: settings.date_format.clone(),
        }
    }

    pub fn policy(&self) -> DeductionPolicy {
        self.policy
    }

    /// Create a user with the starter categories
    pub fn create_user(&self, id: &str, currency: Option<Currency>) -> LedgerResult<User> {
        let id = id.trim();
        if id.is_empty() {
            return Err(LedgerError::Validation("User ID cannot be empty".into()));
        }
        if self.repo.exists(id)? {
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier: id.to_string(),
            });
        }

        let user = User::with_currency(id, currency.unwrap_or_else(|| self.default_currency.clone()));
        self.repo.save(&user)?;
        info!(user = %user.id, currency = %user.currency, "user created");
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> LedgerResult<User> {
        self.repo.get_by_id(id)
    }

    pub fn list_users(&self) -> LedgerResult<Vec<String>> {
        self.repo.list_ids()
    }

    /// Replace a user's allocation rules
    pub fn set_allocation_rules(&self, id: &str, rules: Vec<AllocationRule>) -> LedgerResult<User> {
        self.mutate(id, "set allocation rules", |user| {
            user.set_allocation_rules(rules)?;
            Ok(user.clone())
        })
    }

    /// Link a category to a bank account
    pub fn link_bank_account(
        &self,
        id: &str,
        kind: CategoryKind,
        account: BankAccount,
    ) -> LedgerResult<User> {
        self.mutate(id, "link bank account", |user| {
            user.link_bank_account(kind, account)?;
            Ok(user.clone())
        })
    }

    /// Allocate an income across the user's categories
    pub fn allocate_income(
        &self,
        id: &str,
        income: Money,
        date: NaiveDate,
        description: &str,
    ) -> LedgerResult<AllocationOutcome> {
        self.mutate(id, "allocate income", |user| {
            user.allocate_income(income, date, description)
        })
    }

    /// Deduct an expense through the waterfall
    pub fn process_expense(&self, id: &str, expense: Transaction) -> LedgerResult<Vec<CategoryDraw>> {
        let policy = self.policy;
        self.mutate(id, "process expense", |user| {
            user.process_expense_with(expense, policy)
        })
    }

    /// Replay a bank statement through the waterfall
    pub fn process_account_statement(
        &self,
        id: &str,
        statement: AccountStatement,
    ) -> LedgerResult<StatementOutcome> {
        let policy = self.policy;
        self.mutate(id, "process statement", |user| {
            user.process_account_statement(statement, policy)
        })
    }

    /// Parse a CSV statement export and replay it
    pub fn import_statement_csv<Rd: Read>(
        &self,
        id: &str,
        reader: Rd,
        bank_account: BankAccount,
    ) -> LedgerResult<StatementOutcome> {
        let user = self.repo.get_by_id(id)?;
        let importer = StatementImporter::new(user.currency.clone(), self.date_format.clone());
        let statement = importer.parse_reader(reader, bank_account)?;
        self.process_account_statement(id, statement)
    }

    pub fn period_summary(&self, id: &str, period: &Period) -> LedgerResult<PeriodSummary> {
        self.repo.get_by_id(id)?.period_summary(period)
    }

    pub fn income_status(&self, id: &str, period: &Period) -> LedgerResult<IncomeStatus> {
        self.repo.get_by_id(id)?.income_status(period)
    }

    /// Load a user, apply `op`, and save whatever `op` changed
    fn mutate<T, F>(&self, id: &str, action: &str, op: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut User) -> LedgerResult<T>,
    {
        let mut user = self.repo.get_by_id(id)?;
        let before = user.clone();

        match op(&mut user) {
            Ok(value) => {
                self.repo.save(&user)?;
                Ok(value)
            }
            Err(err) => {
                if user != before {
                    warn!(user = %id, action, error = %err, "saving partially applied operation");
                    self.repo.save(&user)?;
                } else {
                    warn!(user = %id, action, error = %err, "operation rejected");
                }
                Err(err)
            }
        }
    }
}
