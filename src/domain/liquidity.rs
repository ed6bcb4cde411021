//! Liquidity units resident in price bins.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Liquidity units held by a bin or claimed by a position.
///
/// Distinct from [`Amount`](super::Amount): one unit of liquidity is worth
/// one unit of asset A (or `price` units of asset B) at the bin's price
/// when it was deposited, and it is a share of the bin's reserves after
/// that.  All `u128` values are valid.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::Liquidity;
///
/// let a = Liquidity::new(1_000);
/// let b = Liquidity::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(Liquidity::new(3_000)));
/// assert_eq!(b.checked_mul_count(3), Some(Liquidity::new(6_000)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Liquidity(u128);

impl Liquidity {
    /// No liquidity.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Liquidity` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the liquidity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Scales per-bin liquidity by a bin count.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub const fn checked_mul_count(&self, count: u32) -> Option<Self> {
        match self.0.checked_mul(count as u128) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Splits total liquidity evenly over `count` bins, rounding down.
    ///
    /// Returns `None` if `count` is zero.
    #[must_use]
    pub const fn per_bin(&self, count: u32) -> Option<Self> {
        if count == 0 {
            return None;
        }
        Some(Self(self.0 / count as u128))
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
