//! Basis-point representation for bin steps and fee rates.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::BookError;

/// Denominator that represents 100%.
pub const BASIS_POINT_MAX: u16 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Both the pool's bin step and its swap fee rate are basis points stored
/// as `u16`.  Values above 10 000 are representable but are not valid
/// percentages; see [`is_valid_percent`](Self::is_valid_percent).
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::{Amount, BasisPoints, Rounding};
///
/// let fee = BasisPoints::new(50); // 0.5%
/// assert_eq!(fee.apply(Amount::new(10_000), Rounding::Down), Ok(Amount::new(50)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u16);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(BASIS_POINT_MAX);

    /// Creates a new `BasisPoints` from a raw `u16` value.
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the underlying `u16` value.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= BASIS_POINT_MAX
    }

    /// Computes `amount * self / 10_000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::MathOverflow`] if the result does not fit an
    /// [`Amount`] (only possible for values above 100%).
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        // u64 * u16 always fits in u128.
        let product = amount.as_u128() * self.0 as u128;
        let divisor = BASIS_POINT_MAX as u128;
        let quotient = match rounding {
            Rounding::Down => product / divisor,
            Rounding::Up => product.div_ceil(divisor),
        };
        match Amount::try_from_u128(quotient) {
            Some(v) => Ok(v),
            None => Err(BookError::MathOverflow("basis points apply")),
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
