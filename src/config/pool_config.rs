//! Parameters for creating a pool.

use serde::{Deserialize, Serialize};

use super::BookConfig;
use crate::domain::{Address, BasisPoints, BinId, MintPair};
use crate::error::BookError;
use crate::math::price_at_bin;

/// Parameters of a new pool, checked against a [`BookConfig`] at creation.
///
/// # Validation
///
/// - `mint_a` must sort strictly before `mint_b`.
/// - `bin_step` must be non-zero.
/// - `(bin_step, fee_rate)` must be whitelisted.
/// - `initial_bin_id` must be a multiple of `bin_step` with a
///   representable price.
///
/// # Examples
///
/// ```
/// use liquidity_book::config::{BookConfig, PoolConfig};
/// use liquidity_book::domain::{Address, BasisPoints};
///
/// let config = PoolConfig::new(
///     Address::from_bytes([1u8; 32]),
///     Address::from_bytes([2u8; 32]),
///     BasisPoints::new(20),
///     BasisPoints::new(50),
///     0,
/// );
/// assert!(config.validate(&BookConfig::default()).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Asset A.
    pub mint_a: Address,
    /// Asset B.
    pub mint_b: Address,
    /// Bin width in basis points.
    pub bin_step: BasisPoints,
    /// Swap fee in basis points.
    pub fee_rate: BasisPoints,
    /// Bin that starts out active.
    pub initial_bin_id: i32,
}

impl PoolConfig {
    /// Bundles pool parameters without validating them.
    #[must_use]
    pub const fn new(
        mint_a: Address,
        mint_b: Address,
        bin_step: BasisPoints,
        fee_rate: BasisPoints,
        initial_bin_id: i32,
    ) -> Self {
        Self {
            mint_a,
            mint_b,
            bin_step,
            fee_rate,
            initial_bin_id,
        }
    }

    /// Validates the parameters against the book's limits.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidMintOrder`] if the mints are not ordered.
    /// - [`BookError::InvalidBinStep`] if `bin_step` is zero.
    /// - [`BookError::InvalidParameters`] if the pair is not whitelisted.
    /// - [`BookError::InvalidBinId`] if the initial bin is out of range,
    ///   misaligned, or has no representable price.
    pub fn validate(&self, book: &BookConfig) -> Result<(), BookError> {
        self.resolve(book).map(|_| ())
    }

    /// Validates and returns the typed mint pair and initial bin.
    pub(crate) fn resolve(&self, book: &BookConfig) -> Result<(MintPair, BinId), BookError> {
        let mints = MintPair::new(self.mint_a, self.mint_b)?;
        if self.bin_step.is_zero() {
            return Err(BookError::InvalidBinStep);
        }
        if !book.is_allowed(self.bin_step, self.fee_rate) {
            return Err(BookError::InvalidParameters);
        }
        let initial = BinId::new(self.initial_bin_id)?;
        if !initial.is_aligned(self.bin_step) {
            return Err(BookError::InvalidBinId(
                "initial bin must be a multiple of the bin step",
            ));
        }
        price_at_bin(initial, self.bin_step)?;
        Ok((mints, initial))
    }
}
