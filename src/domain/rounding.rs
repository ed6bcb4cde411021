//! Explicit rounding direction for fixed-point division.

use serde::{Deserialize, Serialize};

/// Direction in which a fixed-point quotient is rounded.
///
/// Every division in the ledger names its direction so that rounding always
/// favors the bin: deposits are rounded up, withdrawals and swap output are
/// rounded down.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::Rounding;
///
/// assert_eq!(Rounding::Down.divide(7, 2), Some(3));
/// assert_eq!(Rounding::Up.divide(7, 2), Some(4));
/// assert_eq!(Rounding::Up.divide(7, 0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Ceiling.
    Up,
    /// Floor.
    Down,
}

impl Rounding {
    /// Divides `numerator` by `denominator` in this direction.
    ///
    /// Returns `None` if `denominator` is zero.
    #[must_use]
    pub const fn divide(&self, numerator: u128, denominator: u128) -> Option<u128> {
        if denominator == 0 {
            return None;
        }
        match self {
            Self::Down => Some(numerator / denominator),
            Self::Up => Some(numerator.div_ceil(denominator)),
        }
    }

    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}
