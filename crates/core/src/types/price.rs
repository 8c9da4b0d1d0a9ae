//! Non-negative money amounts using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount has more than [`Price::MAX_SCALE`] decimal places.
    #[error("price cannot have more than 2 decimal places (got {0})")]
    TooPrecise(Decimal),
    /// The amount, or a total built from it, exceeds [`Price::MAX`].
    #[error("amount exceeds the maximum of 9999999999.99")]
    TooLarge,
}

/// A price in the store's single currency.
///
/// Bounded to what a `NUMERIC(12, 2)` column holds: at most two decimal
/// places and at most [`Price::MAX`]. Arithmetic is checked against the same
/// bound, so every store accepts exactly the same amounts.
///
/// Serialized as a decimal string (`"19.99"`) so no precision is lost on the
/// way to the till. Deserialization also accepts JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest representable amount, `9999999999.99`.
    pub const MAX: Self = Self(Decimal::from_parts(3_567_587_327, 232, 0, false, 2));

    /// Decimal places allowed.
    pub const MAX_SCALE: u32 = 2;

    /// Create a price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero,
    /// [`PriceError::TooPrecise`] for sub-cent amounts and
    /// [`PriceError::TooLarge`] above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount.normalize().scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise(amount));
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooLarge`] if the result exceeds [`Price::MAX`].
    pub fn checked_times(self, quantity: u32) -> Result<Self, PriceError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .ok_or(PriceError::TooLarge)
            .and_then(Self::new)
    }

    /// Sum of `self` and `rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooLarge`] if the result exceeds [`Price::MAX`].
    pub fn checked_add(self, rhs: Self) -> Result<Self, PriceError> {
        self.0
            .checked_add(rhs.0)
            .ok_or(PriceError::TooLarge)
            .and_then(Self::new)
    }

    /// Sum of all `prices`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooLarge`] as soon as the running total exceeds
    /// [`Price::MAX`].
    pub fn checked_sum<I>(prices: I) -> Result<Self, PriceError>
    where
        I: IntoIterator<Item = Self>,
    {
        prices
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
