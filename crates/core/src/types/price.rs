//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `rust_decimal::Decimal` so that revenue sums do not
//! accumulate binary floating point error, but they travel over the wire and
//! into the document as plain JSON numbers (`89.9`, not `"89.9"`) to stay
//! compatible with existing `db.json` files.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ValidationError;

/// A non-negative catalog price in the store's currency (BRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NegativePrice` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::NegativePrice);
        }
        Ok(Self(amount))
    }

    /// Create a price from a JSON number.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NonFinitePrice` for NaN, infinities, or values
    /// outside decimal range, and `ValidationError::NegativePrice` below zero.
    pub fn from_f64(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::NonFinitePrice);
        }
        let amount = Decimal::from_f64(amount).ok_or(ValidationError::NonFinitePrice)?;
        Self::new(amount)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount as a float, for display and JSON.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

/// Stored prices go through [`Price::new`], so a negative amount in the
/// document is rejected at load time.
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
