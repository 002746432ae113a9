//! Period summary report
//!
//! Re-derives income and expense totals for a period from the user's logs,
//! and classifies whether the period's expenses were covered by income.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::LedgerResult;
use crate::models::{CategoryKind, Money, Period, Transaction, User};

/// Incomes and expenses that fall within a period, with their totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub incomes: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
    pub total_income: Money,
    pub total_expense: Money,
    /// Total the period's expenses drew from each category they touched
    pub drawn: BTreeMap<CategoryKind, Money>,
}

impl PeriodSummary {
    /// Generate the summary for `period`
    ///
    /// Pure function of the user's logs: calling it twice without a mutation
    /// in between gives the same summary. Fails only if a total overflows.
    pub fn generate(user: &User, period: &Period) -> LedgerResult<Self> {
        let in_period = |log: &[Transaction]| -> Vec<Transaction> {
            log.iter()
                .filter(|t| period.contains(t.date))
                .cloned()
                .collect()
        };

        let incomes = in_period(&user.incomes);
        let expenses = in_period(&user.expenses);

        let total_income = Money::sum_in(&user.currency, incomes.iter().map(|t| &t.amount))?;
        let total_expense = expenses
            .iter()
            .try_fold(Money::zero(user.currency.clone()), |acc, t| {
                acc.checked_add(&t.magnitude())
            })?;

        let mut drawn: BTreeMap<CategoryKind, Money> = BTreeMap::new();
        for draw in expenses.iter().flat_map(|t| &t.draws) {
            let total = match drawn.get(&draw.category) {
                Some(so_far) => so_far.checked_add(&draw.amount)?,
                None => draw.amount.clone(),
            };
            drawn.insert(draw.category, total);
        }

        Ok(Self {
            period: *period,
            incomes,
            expenses,
            total_income,
            total_expense,
            drawn,
        })
    }

    /// Income minus expenses (negative when the period overspent)
    pub fn net(&self) -> LedgerResult<Money> {
        self.total_income.checked_sub(&self.total_expense)
    }

    /// Amount expenses in the period drew from a category
    pub fn drawn_from(&self, category: CategoryKind) -> Money {
        self.drawn
            .get(&category)
            .cloned()
            .unwrap_or_else(|| self.total_expense.zeroed())
    }

    /// Whether any expense in the period reached Emergency or Savings
    pub fn reserves_drawn(&self) -> bool {
        self.drawn
            .iter()
            .any(|(kind, amount)| kind.is_reserve() && amount.is_positive())
    }
}

/// Classification of how a period's expenses were funded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IncomeStatus {
    /// Emergency and/or Savings balances are below zero
    ReservesUsed { emergency: bool, savings: bool },
    /// Income in the period is at least the period's expenses
    IncomeCoversExpenses,
    /// Expenses in the period exceed its income
    ExpensesExceedIncome,
}

impl IncomeStatus {
    /// Classify the period
    ///
    /// Reserves count as used when the Emergency or Savings balance is below
    /// zero. Otherwise the period's income and expense totals are compared.
    /// How much the period's expenses drew from reserves is reported
    /// separately by [`PeriodSummary::drawn_from`].
    pub fn check(user: &User, period: &Period) -> LedgerResult<Self> {
        let summary = PeriodSummary::generate(user, period)?;
        Ok(Self::from_summary(user, &summary))
    }

    pub fn from_summary(user: &User, summary: &PeriodSummary) -> Self {
        let below_zero = |kind: CategoryKind| {
            user.categories
                .get(&kind)
                .map(|c| c.balance.is_negative())
                .unwrap_or(false)
        };

        let emergency = below_zero(CategoryKind::Emergency);
        let savings = below_zero(CategoryKind::Savings);

        if emergency || savings {
            Self::ReservesUsed { emergency, savings }
        } else if summary.total_income >= summary.total_expense {
            Self::IncomeCoversExpenses
        } else {
            Self::ExpensesExceedIncome
        }
    }
}

impl fmt::Display for IncomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservesUsed { emergency, savings } => {
                let funds = match (emergency, savings) {
                    (true, true) => "Emergency funds and Savings funds",
                    (true, false) => "Emergency funds",
                    _ => "Savings funds",
                };
                write!(
                    f,
                    "Warning: You have used {} to cover your expenses. \
                     Consider adjusting your lifestyle or increasing your income.",
                    funds
                )
            }
            Self::IncomeCoversExpenses => write!(f, "Your income covers your expenses."),
            Self::ExpensesExceedIncome => write!(f, "Your expenses exceed your income."),
        }
    }
}

impl User {
    /// Incomes and expenses within `period`, with totals
    pub fn period_summary(&self, period: &Period) -> LedgerResult<PeriodSummary> {
        PeriodSummary::generate(self, period)
    }

    /// How the period's expenses were funded
    pub fn income_status(&self, period: &Period) -> LedgerResult<IncomeStatus> {
        IncomeStatus::check(self, period)
    }
}
