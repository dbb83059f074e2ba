//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `numeric(10, 2)`, so a [`Price`] is always finite,
//! non-negative, carries exactly two fractional digits and is at most
//! [`Price::MAX`].

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Infinity or NaN.
    #[error("price must be a finite number")]
    NotFinite,
    /// Below zero.
    #[error("price cannot be negative")]
    Negative,
    /// Does not fit the storage column.
    #[error("price must be at most 99999999.99")]
    TooLarge,
    /// A string that is not a number at all.
    #[error("price must be a number")]
    Unparseable,
}

/// A product price.
///
/// ```
/// use simpletobuy_core::{Price, PriceError};
///
/// let price = Price::from_f64(19.999).unwrap();
/// assert_eq!(price.to_string(), "20.00");
///
/// assert_eq!(Price::from_f64(f64::INFINITY), Err(PriceError::NotFinite));
/// assert_eq!(Price::from_f64(-1.0), Err(PriceError::Negative));
/// assert_eq!("NaN".parse::<Price>(), Err(PriceError::NotFinite));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Number of fractional digits kept.
    pub const SCALE: u32 = 2;

    /// Largest storable price (`numeric(10, 2)`).
    pub const MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

    /// Build a price from a float, rounding half away from zero to cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotFinite`] for infinity and NaN,
    /// [`PriceError::Negative`] below zero and [`PriceError::TooLarge`] above
    /// [`Self::MAX`].
    pub fn from_f64(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if value < 0.0 {
            return Err(PriceError::Negative);
        }

        let amount = Decimal::try_from(value).map_err(|_| PriceError::TooLarge)?;
        Self::from_decimal(amount)
    }

    /// Build a price from a decimal, rounding to cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] below zero and [`PriceError::TooLarge`]
    /// above [`Self::MAX`].
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let mut amount =
            amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        if amount > Self::MAX {
            return Err(PriceError::TooLarge);
        }
        amount.rescale(Self::SCALE);
        amount.set_sign_positive(true);

        Ok(Self(amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    /// Parses the same spellings a JSON float accepts, including `inf` and
    /// `NaN`, so those reach the finiteness check instead of a parse error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| PriceError::Unparseable)?;
        Self::from_f64(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(amount)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_decimal(amount)?)
    }
}
