//! Money type for representing currency amounts
//!
//! Amounts are exact decimals (`rust_decimal::Decimal`) tagged with a currency
//! code, so repeated credits and debits never drift the way binary floats do.
//!
//! The operator impls (`+`, `-`) keep the currency of the left-hand operand,
//! never validate the right-hand one, and panic on overflow like `Decimal`'s.
//! Ledger code goes through [`Money::checked_add`] / [`Money::checked_sub`],
//! which fail with `CurrencyMismatch` or a `Validation` error instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

/// ISO-style currency code, always stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a currency from a code such as "usd" or "USD"
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// US dollars, the currency every starter category is created in
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monetary amount in a specific currency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    /// Create a Money amount
    ///
    /// # Examples
    /// ```
    /// use arus::models::Money;
    /// use rust_decimal_macros::dec;
    /// let amount = Money::new(dec!(10.50), "USD");
    /// assert_eq!(amount.to_string(), "10.50 USD");
    /// ```
    pub fn new(amount: Decimal, currency: impl Into<Currency>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Create a zero amount in the given currency
    pub fn zero(currency: impl Into<Currency>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Zero in the same currency as `self`
    pub fn zeroed(&self) -> Self {
        Self::zero(self.currency.clone())
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self::new(self.amount.abs(), self.currency.clone())
    }

    /// Check whether two amounts share a currency
    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    /// Fail with `CurrencyMismatch` unless `other` is in the same currency
    pub fn ensure_same_currency(&self, other: &Money) -> LedgerResult<()> {
        if self.same_currency(other) {
            Ok(())
        } else {
            Err(LedgerError::CurrencyMismatch {
                left: self.currency.to_string(),
                right: other.currency.to_string(),
            })
        }
    }

    /// Add, failing on a currency mismatch or overflow
    pub fn checked_add(&self, other: &Money) -> LedgerResult<Money> {
        self.ensure_same_currency(other)?;
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.currency.clone()))
            .ok_or_else(|| self.overflow("+", other))
    }

    /// Subtract, failing on a currency mismatch or overflow
    pub fn checked_sub(&self, other: &Money) -> LedgerResult<Money> {
        self.ensure_same_currency(other)?;
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Self::new(amount, self.currency.clone()))
            .ok_or_else(|| self.overflow("-", other))
    }

    /// Multiply by a ratio (used for percentage allocations)
    pub fn scale(&self, ratio: Decimal) -> LedgerResult<Money> {
        self.amount
            .checked_mul(ratio)
            .map(|amount| Self::new(amount, self.currency.clone()))
            .ok_or_else(|| {
                LedgerError::Validation(format!("Amount overflow: {} * {}", self.amount, ratio))
            })
    }

    /// Sum a sequence of amounts in `currency`, starting from zero
    pub fn sum_in<'a, I>(currency: &Currency, iter: I) -> LedgerResult<Money>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        iter.into_iter()
            .try_fold(Money::zero(currency.clone()), |acc, m| acc.checked_add(m))
    }

    fn overflow(&self, op: &str, other: &Money) -> LedgerError {
        LedgerError::Validation(format!(
            "Amount overflow: {} {} {}",
            self.amount, op, other.amount
        ))
    }

    /// Parse an amount such as "10.50", "-3", "$1000" in the given currency
    pub fn parse(s: &str, currency: impl Into<Currency>) -> LedgerResult<Self> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest).replace(',', "");

        let amount = Decimal::from_str(&rest)
            .map_err(|_| LedgerError::Validation(format!("Invalid money format: {}", s)))?;

        Ok(Self::new(if negative { -amount } else { amount }, currency))
    }
}

impl PartialOrd for Money {
    /// Amounts in different currencies are not comparable
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_currency(other) {
            Some(self.amount.cmp(&other.amount))
        } else {
            None
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.amount.round_dp(2);
        amount.rescale(2);
        write!(f, "{} {}", amount, self.currency)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.amount + other.amount, self.currency)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.amount += other.amount;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.amount - other.amount, self.currency)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.amount -= other.amount;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}
