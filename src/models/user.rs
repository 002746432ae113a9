//! User ledger
//!
//! The user is the unit of persistence. It owns one category per
//! [`CategoryKind`], the ordered allocation rules, and the append-only income
//! and expense logs. Income allocation, waterfall deduction and statement
//! replay all live here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use super::allocation::{validate_rules, AllocationOutcome, AllocationRule, CategoryCredit, RuleTotals};
use super::category::{BankAccount, Category, CategoryKind};
use super::money::{Currency, Money};
use super::statement::AccountStatement;
use super::transaction::{CategoryDraw, Transaction};
use crate::error::{LedgerError, LedgerResult};

/// What happens to earlier debits when the waterfall cannot cover an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeductionPolicy {
    /// Check the expense can be covered before debiting anything
    #[default]
    Atomic,
    /// Drain categories as the waterfall goes; a failing expense leaves
    /// earlier categories drained
    Partial,
}

impl fmt::Display for DeductionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic => write!(f, "atomic"),
            Self::Partial => write!(f, "partial"),
        }
    }
}

/// Result of replaying a statement through the waterfall
#[derive(Debug, Clone, PartialEq)]
pub struct StatementOutcome {
    /// Category linked to the statement's bank account
    pub category: CategoryKind,
    /// Number of expenses recorded
    pub processed: usize,
    /// Amount spent across the statement
    pub total: Money,
}

/// A user's budgeting ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    /// Currency every category balance is kept in
    #[serde(default)]
    pub currency: Currency,

    pub categories: BTreeMap<CategoryKind, Category>,

    #[serde(default)]
    pub allocation_rules: Vec<AllocationRule>,

    #[serde(default)]
    pub incomes: Vec<Transaction>,

    #[serde(default)]
    pub expenses: Vec<Transaction>,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with the starter categories, in USD
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_currency(id, Currency::usd())
    }

    /// Create a user with the starter categories in a given currency
    pub fn with_currency(id: impl Into<String>, currency: Currency) -> Self {
        let categories = CategoryKind::all()
            .iter()
            .map(|kind| (*kind, Category::new(*kind, currency.clone())))
            .collect();

        Self {
            id: id.into(),
            currency,
            categories,
            allocation_rules: Vec::new(),
            incomes: Vec::new(),
            expenses: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn category(&self, kind: CategoryKind) -> LedgerResult<&Category> {
        self.categories
            .get(&kind)
            .ok_or_else(|| LedgerError::UnknownCategory(kind.to_string()))
    }

    fn category_mut(&mut self, kind: CategoryKind) -> LedgerResult<&mut Category> {
        self.categories
            .get_mut(&kind)
            .ok_or_else(|| LedgerError::UnknownCategory(kind.to_string()))
    }

    /// Current balance of a category
    pub fn balance(&self, kind: CategoryKind) -> LedgerResult<Money> {
        Ok(self.category(kind)?.balance.clone())
    }

    /// Sum of all category balances
    pub fn total_balance(&self) -> LedgerResult<Money> {
        Money::sum_in(&self.currency, self.categories.values().map(|c| &c.balance))
    }

    /// Replace the allocation rules after validating them as a set
    pub fn set_allocation_rules(&mut self, rules: Vec<AllocationRule>) -> LedgerResult<()> {
        validate_rules(&rules, &self.currency)?;
        for rule in &rules {
            self.category(rule.category)?;
        }
        self.allocation_rules = rules;
        Ok(())
    }

    /// Point a category at a different bank account
    ///
    /// A bank account may back at most one category.
    pub fn link_bank_account(&mut self, kind: CategoryKind, account: BankAccount) -> LedgerResult<()> {
        if let Some(owner) = self.category_for_bank_account(&account) {
            if owner != kind {
                return Err(LedgerError::Duplicate {
                    entity_type: "Bank account",
                    identifier: account.to_string(),
                });
            }
        }
        self.category_mut(kind)?.bank_account = account;
        Ok(())
    }

    /// Category whose bank account matches both number and bank name
    pub fn category_for_bank_account(&self, account: &BankAccount) -> Option<CategoryKind> {
        self.categories
            .values()
            .find(|c| c.bank_account == *account)
            .map(|c| c.kind)
    }

    /// Split an income across the categories according to the rule set
    ///
    /// Fixed amounts come off the top; percentage rules share what remains.
    /// Every check runs before the first credit, so a rejected income leaves
    /// all balances untouched. A zero income credits nothing but is still
    /// logged. A negative income always exceeds the fixed total and is
    /// rejected with `AllocationExceedsIncome`. On success the income is
    /// appended to the income log.
    pub fn allocate_income(
        &mut self,
        income: Money,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> LedgerResult<AllocationOutcome> {
        if self.allocation_rules.is_empty() {
            return Err(LedgerError::NoAllocationPlanned);
        }

        Money::zero(self.currency.clone()).ensure_same_currency(&income)?;

        let totals = RuleTotals::compute(&self.allocation_rules, &self.currency)?;
        if totals.fixed > income {
            return Err(LedgerError::AllocationExceedsIncome {
                fixed: totals.fixed.to_string(),
                income: income.to_string(),
            });
        }
        totals.ensure_percentages_fit()?;

        let remaining = income.checked_sub(&totals.fixed)?;

        let mut credits = Vec::with_capacity(self.allocation_rules.len());
        for rule in &self.allocation_rules {
            self.category(rule.category)?;
            credits.push(CategoryCredit {
                category: rule.category,
                amount: rule.allocation_for(&remaining)?,
            });
        }
        let credited = Money::sum_in(&self.currency, credits.iter().map(|c| &c.amount))?;
        let unallocated = income.checked_sub(&credited)?;

        // Credit a copy so an overflow part-way through leaves no trace
        let mut categories = self.categories.clone();
        for credit in &credits {
            debug!(user = %self.id, category = %credit.category, amount = %credit.amount, "credit");
            categories
                .get_mut(&credit.category)
                .ok_or_else(|| LedgerError::UnknownCategory(credit.category.to_string()))?
                .credit(&credit.amount)?;
        }
        self.categories = categories;

        let entry = Transaction::income(income.clone(), date, description);
        info!(user = %self.id, entry = %entry.id, income = %income, rules = credits.len(), "income allocated");
        self.incomes.push(entry);
        Ok(AllocationOutcome {
            income,
            credits,
            unallocated,
        })
    }

    /// Deduct an expense with the default (atomic) policy
    pub fn process_expense(&mut self, expense: Transaction) -> LedgerResult<Vec<CategoryDraw>> {
        self.process_expense_with(expense, DeductionPolicy::default())
    }

    /// Deduct an expense from the categories in waterfall order
    ///
    /// Each category is drained completely before the next one is touched.
    /// When the categories together cannot cover the expense the call fails
    /// with `InsufficientFundsAcrossCategories` and the expense is not
    /// recorded; whether the drained categories stay drained depends on
    /// `policy`. On success the expense is appended to the expense log with
    /// the draws it made.
    pub fn process_expense_with(
        &mut self,
        mut expense: Transaction,
        policy: DeductionPolicy,
    ) -> LedgerResult<Vec<CategoryDraw>> {
        Money::zero(self.currency.clone()).ensure_same_currency(&expense.amount)?;

        let needed = expense.magnitude();
        let (draws, uncovered) = self.plan_waterfall(&needed);

        if uncovered.is_positive() {
            if policy == DeductionPolicy::Partial {
                self.apply_draws(&draws)?;
            }
            warn!(
                user = %self.id,
                needed = %needed,
                uncovered = %uncovered,
                policy = %policy,
                "expense rejected"
            );
            return Err(LedgerError::InsufficientFundsAcrossCategories {
                needed: needed.to_string(),
                covered: (needed - uncovered).to_string(),
            });
        }

        self.apply_draws(&draws)?;
        expense.amount = needed.clone();
        expense.draws = draws.clone();
        info!(user = %self.id, entry = %expense.id, amount = %needed, draws = draws.len(), "expense recorded");
        self.expenses.push(expense);

        Ok(draws)
    }

    /// Work out the draws for `needed` without touching any balance
    ///
    /// Returns the non-zero draws in waterfall order and the amount left
    /// uncovered.
    fn plan_waterfall(&self, needed: &Money) -> (Vec<CategoryDraw>, Money) {
        let mut remaining = needed.clone();
        let mut draws = Vec::new();

        for kind in CategoryKind::WATERFALL {
            if !remaining.is_positive() {
                break;
            }
            let Some(category) = self.categories.get(&kind) else {
                continue;
            };

            let take = if category.balance >= remaining {
                remaining.clone()
            } else if category.balance.is_positive() {
                category.balance.clone()
            } else {
                continue;
            };

            remaining -= take.clone();
            draws.push(CategoryDraw {
                category: kind,
                amount: take,
            });
        }

        (draws, remaining)
    }

    fn apply_draws(&mut self, draws: &[CategoryDraw]) -> LedgerResult<()> {
        for draw in draws {
            debug!(user = %self.id, category = %draw.category, amount = %draw.amount, "debit");
            self.category_mut(draw.category)?.debit(&draw.amount)?;
        }
        Ok(())
    }

    /// Replay a bank statement's expenses through the waterfall
    ///
    /// The statement's bank account must be linked to one of the user's
    /// categories. Expenses are processed in order; the first failure aborts
    /// the rest of the batch and expenses already processed stay recorded.
    pub fn process_account_statement(
        &mut self,
        statement: AccountStatement,
        policy: DeductionPolicy,
    ) -> LedgerResult<StatementOutcome> {
        let category = self
            .category_for_bank_account(&statement.bank_account)
            .ok_or_else(|| LedgerError::UnknownBankAccount {
                account_number: statement.bank_account.account_number.clone(),
                bank_name: statement.bank_account.bank_name.clone(),
            })?;

        let total = statement.total(&self.currency)?;
        if statement.is_empty() {
            warn!(user = %self.id, statement = %statement.id, category = %category, "statement has no expenses");
        }

        let statement_id = statement.id;
        let mut processed = 0;
        for expense in statement.expenses {
            self.process_expense_with(expense, policy)?;
            processed += 1;
        }

        info!(
            user = %self.id,
            statement = %statement_id,
            category = %category,
            processed,
            total = %total,
            "statement processed"
        );
        Ok(StatementOutcome {
            category,
            processed,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, "USD")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn split_rules() -> Vec<AllocationRule> {
        vec![
            AllocationRule::percentage(CategoryKind::Expense, dec!(0.5)),
            AllocationRule::percentage(CategoryKind::Emergency, dec!(0.3)),
            AllocationRule::percentage(CategoryKind::Savings, dec!(0.2)),
        ]
    }

    fn funded_user() -> User {
        let mut user = User::new("user123");
        user.set_allocation_rules(split_rules()).unwrap();
        user.allocate_income(usd(dec!(1000)), date(2023, 9, 1), "September Salary")
            .unwrap();
        user
    }

    fn balances(user: &User) -> (Decimal, Decimal, Decimal) {
        (
            user.balance(CategoryKind::Expense).unwrap().amount,
            user.balance(CategoryKind::Emergency).unwrap().amount,
            user.balance(CategoryKind::Savings).unwrap().amount,
        )
    }

    fn with_balances(e: Decimal, g: Decimal, s: Decimal) -> User {
        let mut user = User::new("u");
        user.categories
            .get_mut(&CategoryKind::Expense)
            .unwrap()
            .credit(&usd(e))
            .unwrap();
        user.categories
            .get_mut(&CategoryKind::Emergency)
            .unwrap()
            .credit(&usd(g))
            .unwrap();
        user.categories
            .get_mut(&CategoryKind::Savings)
            .unwrap()
            .credit(&usd(s))
            .unwrap();
        user
    }

    fn expense(amount: Decimal) -> Transaction {
        Transaction::expense(usd(amount), date(2023, 9, 15), "Car Repair")
    }

    #[test]
    fn test_new_user_has_starter_categories() {
        let user = User::new("user123");
        assert_eq!(user.categories.len(), 3);
        for kind in CategoryKind::all() {
            let category = user.category(*kind).unwrap();
            assert!(category.balance.is_zero());
            assert_eq!(category.currency(), &Currency::usd());
        }
        assert!(user.allocation_rules.is_empty());
        assert!(user.incomes.is_empty());
        assert!(user.expenses.is_empty());
    }

    #[test]
    fn test_allocate_without_rules() {
        let mut user = User::new("user123");
        let err = user
            .allocate_income(usd(dec!(1000)), date(2023, 9, 1), "")
            .unwrap_err();
        assert_eq!(err, LedgerError::NoAllocationPlanned);
        assert!(user.incomes.is_empty());
    }

    #[test]
    fn test_percentage_split() {
        let user = funded_user();
        assert_eq!(balances(&user), (dec!(500), dec!(300), dec!(200)));
        assert_eq!(user.incomes.len(), 1);
        assert_eq!(user.incomes[0].description, "September Salary");
    }

    #[test]
    fn test_percentage_conservation() {
        let mut user = User::new("u");
        user.set_allocation_rules(vec![
            AllocationRule::percentage(CategoryKind::Expense, dec!(0.333)),
            AllocationRule::percentage(CategoryKind::Savings, dec!(0.4)),
        ])
        .unwrap();

        let outcome = user
            .allocate_income(usd(dec!(1234.56)), date(2023, 9, 1), "")
            .unwrap();

        let expected = dec!(1234.56) * dec!(0.733);
        let credited: Decimal = outcome.credits.iter().map(|c| c.amount.amount).sum();
        assert_eq!(credited, expected);
        assert_eq!(user.total_balance().unwrap().amount, expected);
        assert_eq!(outcome.unallocated.amount, dec!(1234.56) - expected);
        assert_eq!(user.incomes.len(), 1);
    }

    #[test]
    fn test_fixed_taken_before_percentages() {
        let mut user = User::new("u");
        user.set_allocation_rules(vec![
            AllocationRule::percentage(CategoryKind::Savings, dec!(0.5)),
            AllocationRule::fixed(CategoryKind::Expense, usd(dec!(400))),
            AllocationRule::percentage(CategoryKind::Emergency, dec!(0.5)),
        ])
        .unwrap();

        let outcome = user
            .allocate_income(usd(dec!(1000)), date(2023, 9, 1), "")
            .unwrap();

        assert_eq!(balances(&user), (dec!(400), dec!(300), dec!(300)));
        let order: Vec<_> = outcome.credits.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![CategoryKind::Savings, CategoryKind::Expense, CategoryKind::Emergency]
        );
    }

    #[test]
    fn test_fixed_exceeding_income() {
        let mut user = User::new("u");
        user.set_allocation_rules(vec![
            AllocationRule::fixed(CategoryKind::Expense, usd(dec!(800))),
            AllocationRule::fixed(CategoryKind::Savings, usd(dec!(300))),
        ])
        .unwrap();

        let err = user
            .allocate_income(usd(dec!(1000)), date(2023, 9, 1), "")
            .unwrap_err();
        assert!(matches!(err, LedgerError::AllocationExceedsIncome { .. }));
        assert_eq!(balances(&user), (dec!(0), dec!(0), dec!(0)));
        assert!(user.incomes.is_empty());
    }

    #[test]
    fn test_percentage_overflow_leaves_balances() {
        let mut user = funded_user();
        user.allocation_rules = vec![
            AllocationRule::percentage(CategoryKind::Expense, dec!(0.5)),
            AllocationRule::percentage(CategoryKind::Emergency, dec!(0.3)),
            AllocationRule::percentage(CategoryKind::Savings, dec!(0.3)),
        ];

        let err = user
            .allocate_income(usd(dec!(1000)), date(2023, 10, 1), "")
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::PercentageOverflow {
                total: "1.1".into()
            }
        );
        assert_eq!(balances(&user), (dec!(500), dec!(300), dec!(200)));
        assert_eq!(user.incomes.len(), 1);
    }

    #[test]
    fn test_set_rules_rejects_overflow() {
        let mut user = User::new("u");
        let err = user
            .set_allocation_rules(vec![
                AllocationRule::percentage(CategoryKind::Expense, dec!(0.7)),
                AllocationRule::percentage(CategoryKind::Savings, dec!(0.4)),
            ])
            .unwrap_err();
        assert!(matches!(err, LedgerError::PercentageOverflow { .. }));
        assert!(user.allocation_rules.is_empty());
    }

    #[test]
    fn test_unknown_category_credits_nothing() {
        let mut user = User::new("u");
        user.set_allocation_rules(split_rules()).unwrap();
        user.categories.remove(&CategoryKind::Savings);

        let err = user
            .allocate_income(usd(dec!(1000)), date(2023, 9, 1), "")
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownCategory("Savings".into()));
        assert!(user.balance(CategoryKind::Expense).unwrap().is_zero());
        assert!(user.incomes.is_empty());
    }

    #[test]
    fn test_income_currency_mismatch() {
        let mut user = User::new("u");
        user.set_allocation_rules(split_rules()).unwrap();
        let err = user
            .allocate_income(Money::new(dec!(1000), "EUR"), date(2023, 9, 1), "")
            .unwrap_err();
        assert!(matches!(err, LedgerError::CurrencyMismatch { .. }));
    }

    #[test]
    fn test_zero_income_is_logged() {
        let mut user = User::new("u");
        user.set_allocation_rules(split_rules()).unwrap();

        let outcome = user
            .allocate_income(usd(dec!(0)), date(2023, 9, 1), "Nothing")
            .unwrap();

        assert!(outcome.credits.iter().all(|c| c.amount.is_zero()));
        assert_eq!(balances(&user), (dec!(0), dec!(0), dec!(0)));
        assert_eq!(user.incomes.len(), 1);
    }

    #[test]
    fn test_negative_income_exceeds_fixed_total() {
        let mut user = User::new("u");
        user.set_allocation_rules(vec![
            AllocationRule::fixed(CategoryKind::Expense, usd(dec!(100))),
            AllocationRule::percentage(CategoryKind::Savings, dec!(1)),
        ])
        .unwrap();

        let err = user
            .allocate_income(usd(dec!(-50)), date(2023, 9, 1), "")
            .unwrap_err();
        assert!(matches!(err, LedgerError::AllocationExceedsIncome { .. }));

        user.set_allocation_rules(split_rules()).unwrap();
        let err = user
            .allocate_income(usd(dec!(-50)), date(2023, 9, 1), "")
            .unwrap_err();
        assert!(matches!(err, LedgerError::AllocationExceedsIncome { .. }));
        assert!(user.incomes.is_empty());
    }

    #[test]
    fn test_overflowing_income_is_rejected() {
        let huge = Money::parse("79228162514264337593543950335", "USD").unwrap();
        let mut user = User::new("u");
        user.set_allocation_rules(vec![AllocationRule::percentage(
            CategoryKind::Expense,
            dec!(1),
        )])
        .unwrap();

        user.allocate_income(huge.clone(), date(2023, 9, 1), "").unwrap();
        let err = user
            .allocate_income(huge.clone(), date(2023, 9, 2), "")
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(user.balance(CategoryKind::Expense).unwrap(), huge);
        assert_eq!(user.incomes.len(), 1);
    }

    #[test]
    fn test_overflow_on_later_credit_leaves_earlier_ones() {
        let mut user = with_balances(dec!(0), dec!(0), Decimal::MAX);
        user.set_allocation_rules(vec![
            AllocationRule::fixed(CategoryKind::Expense, usd(dec!(1))),
            AllocationRule::percentage(CategoryKind::Savings, dec!(1)),
        ])
        .unwrap();

        let err = user
            .allocate_income(usd(dec!(10)), date(2023, 9, 1), "")
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(balances(&user), (dec!(0), dec!(0), Decimal::MAX));
        assert!(user.incomes.is_empty());
    }

    #[test]
    fn test_waterfall_drains_in_order() {
        let mut user = funded_user();

        let draws = user.process_expense(expense(dec!(900))).unwrap();

        assert_eq!(balances(&user), (dec!(0), dec!(0), dec!(100)));
        let taken: Vec<_> = draws.iter().map(|d| (d.category, d.amount.amount)).collect();
        assert_eq!(
            taken,
            vec![
                (CategoryKind::Expense, dec!(500)),
                (CategoryKind::Emergency, dec!(300)),
                (CategoryKind::Savings, dec!(100)),
            ]
        );
        assert_eq!(user.expenses.len(), 1);
        assert_eq!(user.expenses[0].draws, draws);
    }

    #[test]
    fn test_expense_covered_by_first_category() {
        let mut user = funded_user();
        let draws = user.process_expense(expense(dec!(120.50))).unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(balances(&user), (dec!(379.50), dec!(300), dec!(200)));
    }

    #[test]
    fn test_waterfall_skips_empty_categories() {
        let mut user = with_balances(dec!(0), dec!(0), dec!(50));
        let draws = user.process_expense(expense(dec!(20))).unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].category, CategoryKind::Savings);
        assert_eq!(balances(&user), (dec!(0), dec!(0), dec!(30)));
    }

    #[test]
    fn test_waterfall_totals_match_min_of_expense_and_funds() {
        let cases = [
            (dec!(0), dec!(10), dec!(20), dec!(30)),
            (dec!(25), dec!(10), dec!(20), dec!(30)),
            (dec!(60), dec!(10), dec!(20), dec!(30)),
            (dec!(61), dec!(10), dec!(20), dec!(30)),
            (dec!(5), dec!(0), dec!(0), dec!(5)),
        ];

        for (amount, e, g, s) in cases {
            let mut user = with_balances(e, g, s);
            let before = user.total_balance().unwrap().amount;
            let _ = user.process_expense_with(expense(amount), DeductionPolicy::Partial);
            let debited = before - user.total_balance().unwrap().amount;
            assert_eq!(debited, amount.min(e + g + s), "expense {}", amount);

            let (after_e, after_g, after_s) = balances(&user);
            if after_g < g {
                assert!(after_e.is_zero());
            }
            if after_s < s {
                assert!(after_e.is_zero() && after_g.is_zero());
            }
        }
    }

    #[test]
    fn test_atomic_failure_leaves_balances() {
        let mut user = with_balances(dec!(0), dec!(0), dec!(100));

        let err = user.process_expense(expense(dec!(900))).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientFundsAcrossCategories {
                needed: "900.00 USD".into(),
                covered: "100.00 USD".into(),
            }
        );
        assert_eq!(balances(&user), (dec!(0), dec!(0), dec!(100)));
        assert!(user.expenses.is_empty());
    }

    #[test]
    fn test_partial_failure_keeps_debits() {
        let mut user = funded_user();
        user.process_expense(expense(dec!(900))).unwrap();

        let err = user
            .process_expense_with(expense(dec!(900)), DeductionPolicy::Partial)
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientFundsAcrossCategories { .. }
        ));
        assert_eq!(balances(&user), (dec!(0), dec!(0), dec!(0)));
        assert_eq!(user.expenses.len(), 1);
    }

    #[test]
    fn test_negative_expense_is_deducted_by_magnitude() {
        let mut user = funded_user();
        let txn = Transaction::new(usd(dec!(-100)), date(2023, 9, 4), "Groceries");
        user.process_expense(txn).unwrap();
        assert_eq!(balances(&user), (dec!(400), dec!(300), dec!(200)));
        assert_eq!(user.expenses[0].amount.amount, dec!(100));
    }

    #[test]
    fn test_expense_currency_mismatch() {
        let mut user = funded_user();
        let txn = Transaction::expense(Money::new(dec!(1), "EUR"), date(2023, 9, 4), "");
        assert!(matches!(
            user.process_expense(txn),
            Err(LedgerError::CurrencyMismatch { .. })
        ));
        assert!(user.expenses.is_empty());
    }

    #[test]
    fn test_statement_unknown_account() {
        let mut user = funded_user();
        let statement = AccountStatement::new(
            BankAccount::new("EXP123", "Other Bank"),
            vec![expense(dec!(10))],
        );
        let err = user
            .process_account_statement(statement, DeductionPolicy::Atomic)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnknownBankAccount {
                account_number: "EXP123".into(),
                bank_name: "Other Bank".into(),
            }
        );
        assert!(user.expenses.is_empty());
    }

    #[test]
    fn test_statement_replays_in_order_and_aborts() {
        let mut user = funded_user();
        let statement = AccountStatement::new(
            BankAccount::new("EXP123", "Expense Bank"),
            vec![expense(dec!(600)), expense(dec!(500)), expense(dec!(1))],
        );

        let err = user
            .process_account_statement(statement, DeductionPolicy::Atomic)
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientFundsAcrossCategories { .. }
        ));
        assert_eq!(user.expenses.len(), 1);
        assert_eq!(balances(&user), (dec!(0), dec!(200), dec!(200)));
    }

    #[test]
    fn test_statement_success() {
        let mut user = funded_user();
        let statement = AccountStatement::new(
            BankAccount::new("SAV123", "Savings Bank"),
            vec![expense(dec!(50)), expense(dec!(25))],
        );
        let outcome = user
            .process_account_statement(statement, DeductionPolicy::Atomic)
            .unwrap();
        assert_eq!(outcome.category, CategoryKind::Savings);
        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.total.amount, dec!(75));
        assert_eq!(balances(&user), (dec!(425), dec!(300), dec!(200)));
    }

    #[test]
    fn test_empty_statement_records_nothing() {
        let mut user = funded_user();
        let statement = AccountStatement::new(BankAccount::new("EXP123", "Expense Bank"), vec![]);
        let outcome = user
            .process_account_statement(statement, DeductionPolicy::Atomic)
            .unwrap();
        assert_eq!(outcome.processed, 0);
        assert!(outcome.total.is_zero());
        assert!(user.expenses.is_empty());
    }

    #[test]
    fn test_link_bank_account() {
        let mut user = User::new("u");
        let account = BankAccount::new("123-456", "Local Credit Union");
        user.link_bank_account(CategoryKind::Expense, account.clone())
            .unwrap();
        assert_eq!(
            user.category_for_bank_account(&account),
            Some(CategoryKind::Expense)
        );

        let err = user
            .link_bank_account(CategoryKind::Savings, account)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));
    }

    #[test]
    fn test_serialization() {
        let mut user = funded_user();
        user.process_expense(expense(dec!(550))).unwrap();

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains(r#""allocation_rules""#));
        assert!(json.contains(r#""incomes""#));
        assert!(json.contains(r#""expenses""#));
        assert!(json.contains(r#""Emergency""#));

        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
