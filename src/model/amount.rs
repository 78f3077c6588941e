//! Amount type for handling monetary values exactly.
//!
//! This module provides the `Amount` type which wraps `Decimal` so that sums of many transactions
//! never drift the way binary floating point does. Conversion to display strings only happens at
//! the presentation boundary.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// The number of fractional digits in a minor currency unit, e.g. cents.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Represents a money value in the ledger's single currency.
///
/// Transaction amounts are always positive, but derived values such as net earnings can be
/// negative, so the type itself allows any sign.
///
/// # Examples
///
/// ```
/// # use finance_tracker::model::Amount;
/// # use std::str::FromStr;
/// let income = Amount::from_str("1,250.5").unwrap();
/// let expense = Amount::from_str("0.10").unwrap();
/// assert_eq!((income - expense).to_string(), "1,250.40");
/// assert_eq!(income.display_with("MAD"), "MAD 1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates an amount from a count of minor units, e.g. `1250` -> `12.50`.
    pub fn from_minor(minor: i64) -> Self {
        Self::new(Decimal::new(minor, MINOR_UNIT_SCALE))
    }

    /// Returns the amount as a count of minor units, or `None` if the amount has more fractional
    /// digits than a minor unit can hold or does not fit in an `i64`.
    pub fn to_minor(&self) -> Option<i64> {
        if !self.fits_minor_units() {
            return None;
        }
        self.value
            .checked_mul(Decimal::ONE_HUNDRED)?
            .trunc()
            .to_i64()
    }

    /// Returns true if the amount has at most two significant fractional digits.
    pub fn fits_minor_units(&self) -> bool {
        self.value.normalize().scale() <= MINOR_UNIT_SCALE
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns the value rounded to two fractional digits, the precision used for display.
    pub fn rounded(&self) -> Decimal {
        let mut rounded = self.value.round_dp(MINOR_UNIT_SCALE);
        rounded.rescale(MINOR_UNIT_SCALE);
        rounded
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value.is_sign_negative()
    }

    /// Formats the amount with a currency prefix, e.g. `MAD 1,250.00`.
    pub fn display_with(&self, currency: &str) -> String {
        if currency.is_empty() {
            self.to_string()
        } else {
            format!("{currency} {self}")
        }
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Remove commas (thousand separators)
        let without_commas = trimmed.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        // `rounded` has two fractional digits unless it is too large to rescale.
        let digits = rounded.abs().to_string();
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
        write!(f, "{sign}{}.{fraction}", group_thousands(whole))
    }
}

/// Inserts a comma between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Plain decimal string without separators so that it round-trips exactly.
        serializer.serialize_str(&self.value.normalize().to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::new(self.value + rhs.value)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.value += rhs.value;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount::new(self.value - rhs.value)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.value -= rhs.value;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount::new(-self.value)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + *a)
    }
}
