//! Signed index of a price bin.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::BasisPoints;
use crate::error::BookError;

/// Lowest bin id whose price is representable.
const MIN_BIN_ID: i32 = -443_636;

/// Highest bin id whose price is representable.
const MAX_BIN_ID: i32 = 443_636;

/// A signed bin index.
///
/// Bin `0` trades at price `1.0`; each step of `bin_step` basis points
/// multiplies the price by `1 + bin_step / 10_000`.  A pool only uses ids
/// that are multiples of its bin step, which [`is_aligned`](Self::is_aligned)
/// checks.  Valid ids range from [`MIN`](Self::MIN) to [`MAX`](Self::MAX);
/// ids near the bounds may still be rejected for a given bin step when
/// their price does not fit the fixed-point representation.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::{BasisPoints, BinId};
///
/// let Ok(id) = BinId::new(-40) else { panic!("in range") };
/// assert!(id.is_aligned(BasisPoints::new(20)));
/// assert_eq!(id.stepped(1, BasisPoints::new(20)).map(|b| b.get()), Some(-20));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BinId(i32);

impl BinId {
    /// Lowest valid bin id.
    pub const MIN: Self = Self(MIN_BIN_ID);

    /// Highest valid bin id.
    pub const MAX: Self = Self(MAX_BIN_ID);

    /// The bin trading at price `1.0`.
    pub const ZERO: Self = Self(0);

    /// Creates a bin id with bounds validation.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::InvalidBinId`] if `value` is outside
    /// `[-443636, 443636]`.
    pub const fn new(value: i32) -> crate::error::Result<Self> {
        if value < MIN_BIN_ID || value > MAX_BIN_ID {
            return Err(BookError::InvalidBinId("bin id out of range [-443636, 443636]"));
        }
        Ok(Self(value))
    }

    /// Returns the raw signed index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns `true` if the id is a multiple of `bin_step`.
    ///
    /// A zero step aligns nothing.
    #[must_use]
    pub const fn is_aligned(&self, bin_step: BasisPoints) -> bool {
        let step = bin_step.get() as i32;
        step != 0 && self.0 % step == 0
    }

    /// Moves `steps` bins (negative moves down) of width `bin_step`.
    ///
    /// Returns `None` if the result leaves the valid range.
    #[must_use]
    pub const fn stepped(&self, steps: i32, bin_step: BasisPoints) -> Option<Self> {
        let delta = match steps.checked_mul(bin_step.get() as i32) {
            Some(d) => d,
            None => return None,
        };
        match self.0.checked_add(delta) {
            Some(v) if v >= MIN_BIN_ID && v <= MAX_BIN_ID => Some(Self(v)),
            _ => None,
        }
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
