//! Money type for representing monetary values.
//!
//! Amounts are held as integer cents so totals stay exact. On the wire they
//! are plain decimal numbers (`1210.5`), which is the shape the catalog and
//! the persisted cart snapshot use.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Supported storefront currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    EUR,
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "EUR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "EUR" => Some(Currency::EUR),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A rate in basis points (2100 = 21%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rate {
    basis_points: i64,
}

impl Rate {
    /// Create a rate from basis points.
    pub const fn from_basis_points(basis_points: i64) -> Self {
        Self { basis_points }
    }

    /// The rate in basis points.
    pub const fn basis_points(&self) -> i64 {
        self.basis_points
    }

    /// The rate as a fraction (0.21 for 21%).
    pub fn as_fraction(&self) -> f64 {
        self.basis_points as f64 / 10_000.0
    }
}

/// A currency-less monetary amount in cents.
///
/// Which currency an amount is in is tracked by its owner (a product or a
/// cart), not by the amount itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Zero.
    pub const ZERO: Money = Money { amount_cents: 0 };

    /// Create a new Money value from cents.
    pub const fn from_cents(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from whole units (euros, dollars).
    pub const fn from_units(units: i64) -> Self {
        Self {
            amount_cents: units * 100,
        }
    }

    /// Create a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// Returns `None` for non-finite or out-of-range input.
    ///
    /// ```
    /// use jewel_commerce::money::Money;
    /// let price = Money::from_decimal(49.99).unwrap();
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self::from_cents(cents as i64))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Try to add another amount, returning None on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::from_cents)
    }

    /// Try to multiply by a quantity, returning None on overflow.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.amount_cents.checked_mul(factor).map(Money::from_cents)
    }

    /// Apply a rate, rounding half away from zero to the nearest cent.
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let scaled = self.amount_cents as i128 * rate.basis_points() as i128;
        let half = if scaled < 0 { -5_000 } else { 5_000 };
        Money::from_cents(((scaled + half) / 10_000) as i64)
    }

    /// Sum amounts, returning None on overflow.
    pub fn try_sum(iter: impl IntoIterator<Item = Money>) -> Option<Money> {
        iter.into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }

    /// Format with a currency symbol (e.g., "€1210.00").
    pub fn display(&self, currency: Currency) -> String {
        format!("{}{}", currency.symbol(), self.display_amount())
    }

    /// Format without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_cents(self.amount_cents + other.amount_cents)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_cents(self.amount_cents - other.amount_cents)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_amount())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount)
            .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {}", amount)))
    }
}
