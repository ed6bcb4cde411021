//! Fixed-point bin price.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Rounding;
use crate::math::{PRECISION, mul_div};

/// Units of asset B per unit of asset A, scaled by [`PRECISION`] (`10^12`).
///
/// A price is never zero: it is only produced by
/// [`price_at_bin`](crate::math::price_at_bin), which rejects bins whose
/// price underflows.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::{Price, Rounding};
/// use liquidity_book::math::PRECISION;
///
/// let two = Price::from_scaled(2 * PRECISION);
/// assert_eq!(two.b_for_a(10, Rounding::Down), Some(20));
/// assert_eq!(two.a_for_b(21, Rounding::Up), Some(11));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u128);

impl Price {
    /// Price of bin zero (`1.0`).
    pub const ONE: Self = Self(PRECISION);

    /// Wraps a raw scaled value.
    #[must_use]
    pub const fn from_scaled(scaled: u128) -> Self {
        Self(scaled)
    }

    /// Returns the raw value scaled by [`PRECISION`].
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Converts an amount of asset A into asset B at this price.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn b_for_a(&self, amount_a: u128, rounding: Rounding) -> Option<u128> {
        mul_div(amount_a, self.0, PRECISION, rounding)
    }

    /// Converts an amount of asset B into asset A at this price.
    ///
    /// Returns `None` on overflow or for a zero price.
    #[must_use]
    pub fn a_for_b(&self, amount_b: u128, rounding: Rounding) -> Option<u128> {
        mul_div(amount_b, PRECISION, self.0, rounding)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:012}", self.0 / PRECISION, self.0 % PRECISION)
    }
}
