//! Allocation rules
//!
//! A rule sends part of every income to one category, either as a fixed
//! amount taken off the top or as a percentage of what is left after all
//! fixed amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryKind;
use super::money::{Currency, Money};
use crate::error::{LedgerError, LedgerResult};

/// How a rule sizes its allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationKind {
    /// A fixed amount per income
    FixedAmount { amount: Money },
    /// A share of the income remaining after fixed amounts, in [0, 1]
    Percentage { percentage: Decimal },
}

/// Directive to route part of each income into a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRule {
    pub category: CategoryKind,
    #[serde(flatten)]
    pub kind: AllocationKind,
}

impl AllocationRule {
    pub fn fixed(category: CategoryKind, amount: Money) -> Self {
        Self {
            category,
            kind: AllocationKind::FixedAmount { amount },
        }
    }

    pub fn percentage(category: CategoryKind, percentage: Decimal) -> Self {
        Self {
            category,
            kind: AllocationKind::Percentage { percentage },
        }
    }

    /// Validate a single rule in isolation
    pub fn validate(&self) -> LedgerResult<()> {
        match &self.kind {
            AllocationKind::FixedAmount { amount } if amount.is_negative() => {
                Err(LedgerError::Validation(format!(
                    "Fixed allocation for {} cannot be negative ({})",
                    self.category, amount
                )))
            }
            AllocationKind::Percentage { percentage }
                if *percentage < Decimal::ZERO || *percentage > Decimal::ONE =>
            {
                Err(LedgerError::Validation(format!(
                    "Percentage for {} must be between 0 and 1, got {}",
                    self.category, percentage
                )))
            }
            _ => Ok(()),
        }
    }

    /// The amount this rule allocates, given the income left after fixed rules
    pub fn allocation_for(&self, remaining: &Money) -> LedgerResult<Money> {
        match &self.kind {
            AllocationKind::FixedAmount { amount } => Ok(amount.clone()),
            AllocationKind::Percentage { percentage } => remaining.scale(*percentage),
        }
    }
}

impl fmt::Display for AllocationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AllocationKind::FixedAmount { amount } => write!(f, "{}: {}", self.category, amount),
            AllocationKind::Percentage { percentage } => write!(
                f,
                "{}: {}% of remaining",
                self.category,
                (*percentage * Decimal::ONE_HUNDRED).normalize()
            ),
        }
    }
}

/// Sum of fixed amounts and of percentages across a rule set
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTotals {
    pub fixed: Money,
    pub percentage: Decimal,
}

impl RuleTotals {
    /// Compute totals, with fixed amounts summed in `currency`
    pub fn compute(rules: &[AllocationRule], currency: &Currency) -> LedgerResult<Self> {
        let mut fixed = Money::zero(currency.clone());
        let mut percentage = Decimal::ZERO;

        for rule in rules {
            match &rule.kind {
                AllocationKind::FixedAmount { amount } => fixed = fixed.checked_add(amount)?,
                AllocationKind::Percentage { percentage: p } => percentage += *p,
            }
        }

        Ok(Self { fixed, percentage })
    }

    /// Fail with `PercentageOverflow` when percentages add up past 100%
    pub fn ensure_percentages_fit(&self) -> LedgerResult<()> {
        if self.percentage > Decimal::ONE {
            return Err(LedgerError::PercentageOverflow {
                total: self.percentage.normalize().to_string(),
            });
        }
        Ok(())
    }
}

/// Validate a full rule set: each rule, then the percentage sum
pub fn validate_rules(rules: &[AllocationRule], currency: &Currency) -> LedgerResult<()> {
    for rule in rules {
        rule.validate()?;
    }
    RuleTotals::compute(rules, currency)?.ensure_percentages_fit()
}

/// Credit applied to one category by a single allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCredit {
    pub category: CategoryKind,
    pub amount: Money,
}

/// Result of allocating one income across the rule set
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    pub income: Money,
    pub credits: Vec<CategoryCredit>,
    /// Income not routed to any category (percentages summing below 100%)
    pub unallocated: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, "USD")
    }

    #[test]
    fn test_rule_validation() {
        assert!(AllocationRule::percentage(CategoryKind::Savings, dec!(0.2))
            .validate()
            .is_ok());
        assert!(AllocationRule::percentage(CategoryKind::Savings, dec!(1.2))
            .validate()
            .unwrap_err()
            .is_validation());
        assert!(AllocationRule::percentage(CategoryKind::Savings, dec!(-0.1))
            .validate()
            .is_err());
        assert!(AllocationRule::fixed(CategoryKind::Expense, usd(dec!(-5)))
            .validate()
            .is_err());
    }

    #[test]
    fn test_totals() {
        let rules = vec![
            AllocationRule::fixed(CategoryKind::Expense, usd(dec!(200))),
            AllocationRule::percentage(CategoryKind::Emergency, dec!(0.25)),
            AllocationRule::fixed(CategoryKind::Emergency, usd(dec!(50))),
            AllocationRule::percentage(CategoryKind::Savings, dec!(0.5)),
        ];
        let totals = RuleTotals::compute(&rules, &Currency::usd()).unwrap();
        assert_eq!(totals.fixed.amount, dec!(250));
        assert_eq!(totals.percentage, dec!(0.75));
        assert!(totals.ensure_percentages_fit().is_ok());
    }

    #[test]
    fn test_percentage_overflow() {
        let rules = vec![
            AllocationRule::percentage(CategoryKind::Expense, dec!(0.6)),
            AllocationRule::percentage(CategoryKind::Savings, dec!(0.5)),
        ];
        assert_eq!(
            validate_rules(&rules, &Currency::usd()),
            Err(LedgerError::PercentageOverflow {
                total: "1.1".into()
            })
        );
    }

    #[test]
    fn test_fixed_amount_in_other_currency_is_rejected() {
        let rules = vec![AllocationRule::fixed(
            CategoryKind::Expense,
            Money::new(dec!(10), "EUR"),
        )];
        assert!(matches!(
            validate_rules(&rules, &Currency::usd()),
            Err(LedgerError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_allocation_for() {
        let remaining = usd(dec!(800));
        let fixed = AllocationRule::fixed(CategoryKind::Expense, usd(dec!(200)));
        let pct = AllocationRule::percentage(CategoryKind::Savings, dec!(0.25));
        assert_eq!(fixed.allocation_for(&remaining).unwrap().amount, dec!(200));
        assert_eq!(pct.allocation_for(&remaining).unwrap().amount, dec!(200));
    }

    #[test]
    fn test_display() {
        let pct = AllocationRule::percentage(CategoryKind::Savings, dec!(0.2));
        assert_eq!(pct.to_string(), "Savings: 20% of remaining");
        let fixed = AllocationRule::fixed(CategoryKind::Expense, usd(dec!(150)));
        assert_eq!(fixed.to_string(), "Expense: 150.00 USD");
    }

    #[test]
    fn test_serialization_shape() {
        let rule = AllocationRule::percentage(CategoryKind::Emergency, dec!(0.3));
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(
            json,
            r#"{"category":"Emergency","kind":"percentage","percentage":"0.3"}"#
        );
        let back: AllocationRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
