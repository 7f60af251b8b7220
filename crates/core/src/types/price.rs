//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel as plain JSON numbers (`9.99`) both in local storage and on
//! the backend API, so [`Price`] serializes through `rust_decimal`'s float
//! adapter while doing all arithmetic in `Decimal`.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),

    /// The result does not fit in a decimal.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// The text is not a decimal amount.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the product does not fit.
    pub fn times(self, quantity: u32) -> Result<Self, PriceError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Self)
            .ok_or(PriceError::Overflow)
    }

    /// Sum of two prices.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the sum does not fit.
    pub fn checked_add(self, rhs: Self) -> Result<Self, PriceError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(PriceError::Overflow)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Parses `12.50` or `$12.50`.
impl core::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let digits = text.strip_prefix('$').unwrap_or(text);
        let amount =
            Decimal::from_str_exact(digits).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_json_number_on_the_wire() {
        let price = Price::from_cents(999).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "9.99");

        let parsed: Price = serde_json::from_str("9.99").unwrap();
        assert_eq!(parsed, price);
    }

    #[test]
    fn test_deserialize_negative_fails() {
        assert!(serde_json::from_str::<Price>("-3.5").is_err());
    }

    #[test]
    fn test_times_and_add() {
        let unit = Price::from_cents(250).unwrap();
        assert_eq!(unit.times(3).unwrap(), Price::from_cents(750).unwrap());

        let total = unit.checked_add(unit.times(2).unwrap()).unwrap();
        assert_eq!(total, Price::from_cents(750).unwrap());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge: Price = serde_json::from_str("1e20").unwrap();
        assert_eq!(huge.times(4_000_000_000), Err(PriceError::Overflow));

        let max = Price::new(Decimal::MAX).unwrap();
        assert_eq!(max.checked_add(Price::from_cents(1).unwrap()), Err(PriceError::Overflow));
        assert_eq!(max.times(1).unwrap(), max);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(999).unwrap().to_string(), "$9.99");
        assert_eq!(Price::from_cents(1000).unwrap().to_string(), "$10.00");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("12.50".parse::<Price>().unwrap(), Price::from_cents(1250).unwrap());
        assert_eq!(" $3 ".parse::<Price>().unwrap(), Price::from_cents(300).unwrap());
        assert!(matches!("-1".parse::<Price>(), Err(PriceError::Negative(_))));
        assert_eq!(
            "twelve".parse::<Price>(),
            Err(PriceError::Invalid("twelve".to_string()))
        );
    }
}
