//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Decimal values only
//! appear at the edges: parsing prices out of JSON and formatting for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::CommerceError;

/// Basis points in one whole (100%).
pub const BASIS_POINTS: i64 = 10_000;

/// A US dollar amount held in cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Create a Money value from cents.
    pub const fn from_cents(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a zero amount.
    pub const fn zero() -> Self {
        Self::from_cents(0)
    }

    /// Create a Money value from a decimal dollar amount, rounding half-up
    /// to the nearest cent.
    ///
    /// Returns `None` for NaN, infinities and amounts outside the `i64`
    /// cent range.
    ///
    /// ```
    /// use grimhide_commerce::money::Money;
    /// assert_eq!(Money::from_dollars(19.99).unwrap().amount_cents, 1999);
    /// assert_eq!(Money::from_dollars(0.125).unwrap().amount_cents, 13);
    /// ```
    pub fn from_dollars(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents > i64::MAX as f64 || cents < i64::MIN as f64 {
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

    /// Convert to a decimal dollar value.
    pub fn to_dollars(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Try to add another amount, returning `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::from_cents)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn checked_mul(&self, quantity: u32) -> Option<Money> {
        self.amount_cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Take `bps` basis points of this amount, rounding half-up (away from
    /// zero) to the cent.
    ///
    /// ```
    /// use grimhide_commerce::money::Money;
    /// // 8% of $0.06 is 0.48 cents, which rounds to 0; 8% of $0.07 is 0.56 cents.
    /// assert_eq!(Money::from_cents(6).basis_points(800).amount_cents, 0);
    /// assert_eq!(Money::from_cents(7).basis_points(800).amount_cents, 1);
    /// ```
    pub fn basis_points(&self, bps: u32) -> Money {
        let scaled = i128::from(self.amount_cents) * i128::from(bps);
        let half = i128::from(BASIS_POINTS) / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / i128::from(BASIS_POINTS)
        } else {
            (scaled - half) / i128::from(BASIS_POINTS)
        };
        Money::from_cents(i64::try_from(rounded).unwrap_or(i64::MAX))
    }

    /// Sum amounts, returning `None` on overflow.
    pub fn try_sum(iter: impl IntoIterator<Item = Money>) -> Option<Money> {
        iter.into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!("{}${}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Format without the symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    /// Saturating addition; use [`Money::checked_add`] to detect overflow.
    fn add(self, other: Money) -> Money {
        Money::from_cents(self.amount_cents.saturating_add(other.amount_cents))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_cents(self.amount_cents.saturating_sub(other.amount_cents))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Money {
    type Err = CommerceError;

    /// Parse a decimal dollar string such as `"19.99"`, `"$200"` or `"-5.5"`
    /// without going through floating point.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CommerceError::InvalidPrice(s.to_string());

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);

        let (whole, frac) = rest.split_once('.').unwrap_or((rest, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        if frac.len() > 2 {
            return Err(invalid());
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let amount = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::from_cents(if negative { -amount } else { amount }))
    }
}

/// Serde adapter that writes [`Money`] as a JSON number of dollars.
///
/// Reading accepts any finite, non-negative number and rounds it to the
/// cent. Use with `#[serde(with = "crate::money::dollars")]`.
pub mod dollars {
    use super::Money;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_dollars())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if value < 0.0 {
            return Err(D::Error::custom(format!("negative price {value}")));
        }
        Money::from_dollars(value)
            .ok_or_else(|| D::Error::custom(format!("price {value} out of range")))
    }
}
