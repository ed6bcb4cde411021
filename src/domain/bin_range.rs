//! Inclusive, step-aligned range of bins covered by a position.

use serde::{Deserialize, Serialize};

use super::{BasisPoints, BinId};
use crate::error::BookError;

/// The bins `lower, lower + step, ..., upper` of a position.
///
/// A valid range has `lower < upper`, both ends aligned to the pool's bin
/// step, and spans at most the configured maximum number of bins.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::{BasisPoints, BinId, BinRange};
///
/// let (Ok(lo), Ok(hi)) = (BinId::new(-40), BinId::new(40)) else { panic!("in range") };
/// let Ok(range) = BinRange::new(lo, hi, BasisPoints::new(20), 500) else { panic!("valid") };
/// assert_eq!(range.bin_count(), 5);
/// let ids: Vec<i32> = range.iter().map(|b| b.get()).collect();
/// assert_eq!(ids, vec![-40, -20, 0, 20, 40]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinRange {
    lower: BinId,
    upper: BinId,
    bin_step: BasisPoints,
}

impl BinRange {
    /// Validates and builds a range.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidBinStep`] if `bin_step` is zero.
    /// - [`BookError::InvalidBinRange`] if `lower >= upper` or either end
    ///   is not a multiple of `bin_step`.
    /// - [`BookError::RangeTooWide`] if the range spans more than
    ///   `max_bins` bins.
    pub fn new(
        lower: BinId,
        upper: BinId,
        bin_step: BasisPoints,
        max_bins: u32,
    ) -> crate::error::Result<Self> {
        if bin_step.is_zero() {
            return Err(BookError::InvalidBinStep);
        }
        if lower >= upper {
            return Err(BookError::InvalidBinRange(
                "lower bin must be below upper bin",
            ));
        }
        if !lower.is_aligned(bin_step) || !upper.is_aligned(bin_step) {
            return Err(BookError::InvalidBinRange(
                "bin ids must be multiples of the bin step",
            ));
        }
        let range = Self {
            lower,
            upper,
            bin_step,
        };
        if range.bin_count() > max_bins {
            return Err(BookError::RangeTooWide);
        }
        Ok(range)
    }

    /// Lowest bin of the range.
    #[must_use]
    pub const fn lower(&self) -> BinId {
        self.lower
    }

    /// Highest bin of the range.
    #[must_use]
    pub const fn upper(&self) -> BinId {
        self.upper
    }

    /// Bin width the range is aligned to.
    #[must_use]
    pub const fn bin_step(&self) -> BasisPoints {
        self.bin_step
    }

    /// Number of bins in the range, ends included.
    #[must_use]
    pub const fn bin_count(&self) -> u32 {
        // Both ends lie within +-443_636, so the span fits u32.
        let span = (self.upper.get() as i64 - self.lower.get() as i64) as u64;
        #[allow(clippy::cast_possible_truncation)]
        let count = (span / self.bin_step.get() as u64 + 1) as u32;
        count
    }

    /// Returns `true` if `bin` is one of the range's bins.
    #[must_use]
    pub const fn contains(&self, bin: BinId) -> bool {
        bin.get() >= self.lower.get()
            && bin.get() <= self.upper.get()
            && bin.is_aligned(self.bin_step)
    }

    /// Iterates the range's bin ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = BinId> + '_ {
        let step = self.bin_step.get() as usize;
        (self.lower.get()..=self.upper.get())
            .step_by(step)
            .filter_map(|id| BinId::new(id).ok())
    }

    /// Collects the range's bin ids in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<BinId> {
        self.iter().collect()
    }
}
