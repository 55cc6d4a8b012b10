//! Amount type for handling monetary values typed into a form or read back from storage.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Parsing tolerates a leading
//! currency symbol and thousands separators. Serialization writes a plain JSON number, and
//! deserialization accepts either a number or a numeric string.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Represents a currency-agnostic monetary magnitude.
///
/// # Examples
///
/// Parsing with a currency symbol and commas:
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("₹1,250.50").unwrap();
/// assert_eq!(amount.to_string(), "1,250.50");
/// ```
///
/// Negative values keep their sign:
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$50").unwrap();
/// assert!(amount.is_negative());
/// assert_eq!(amount.to_string(), "-50.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// The largest amount a form accepts: 999,999,999,999.99. Together with the two decimal
    /// places kept by `to_cents`, this keeps every stored amount exact as a JSON number.
    pub const MAX: Amount = Amount(Decimal::from_parts(276_447_231, 23_283, 0, false, 2));

    /// The number of decimal places kept by `to_cents`.
    pub const CENTS: u32 = 2;

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Rounds to two decimal places, with halves rounded away from zero.
    pub fn to_cents(self) -> Amount {
        Amount(
            self.0
                .round_dp_with_strategy(Self::CENTS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns true if the amount has at most two decimal places and its magnitude is no larger
    /// than `Amount::MAX`.
    pub fn is_storable(&self) -> bool {
        self.0.abs() <= Self::MAX.0 && self.to_cents() == *self
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    /// Nothing (or only whitespace) was given.
    Empty,
    /// The text could not be parsed as a decimal number.
    Invalid(String, rust_decimal::Error),
    /// A second minus sign followed the first, e.g. `--5` or `-$-5`.
    RepeatedSign(String),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "AmountError::Empty"),
            AmountError::Invalid(s, e) => write!(f, "AmountError::Invalid({s:?}, {e:?})"),
            AmountError::RepeatedSign(s) => write!(f, "AmountError::RepeatedSign({s:?})"),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "an amount is required"),
            AmountError::Invalid(s, e) => write!(f, "'{s}' is not a valid amount: {e}"),
            AmountError::RepeatedSign(s) => write!(f, "'{s}' has more than one sign"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AmountError::Empty | AmountError::RepeatedSign(_) => None,
            AmountError::Invalid(_, e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        // Strip a sign and then any currency symbol, e.g. "-₹50.00" or "$50"
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let number =
            unsigned.trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'));
        if negative && number.starts_with('-') {
            return Err(AmountError::RepeatedSign(trimmed.to_string()));
        }

        // Remove commas (thousand separators)
        let without_commas = number.replace(',', "");

        let value = Decimal::from_str(&without_commas)
            .map_err(|e| AmountError::Invalid(trimmed.to_string(), e))?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.0.abs())
        } else {
            ("", self.0)
        };
        write!(
            f,
            "{sign}{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Stored records hold a plain number, e.g. "amount": 12.5
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a number or a numeric string")
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Amount, E> {
        // `v.to_string()` is the shortest decimal that reads back as `v`, e.g. 12.3 not 12.2999..
        Decimal::from_str(&v.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(v))
            .map(Amount)
            .ok_or_else(|| E::custom(format!("{v} cannot be represented as an amount")))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
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

    /// Saturates at the bounds of `Decimal` instead of overflowing.
    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
