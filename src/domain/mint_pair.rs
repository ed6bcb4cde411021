//! Canonically ordered pair of asset mints.

use serde::{Deserialize, Serialize};

use super::{Address, SwapDirection};
use crate::error::BookError;

/// The two assets of a pool, with asset A strictly before asset B.
///
/// Unlike a freely sortable pair, construction does not reorder: callers
/// must already present the mints in canonical order, so `(A, B)` and
/// `(B, A)` can never name two different pools.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::{Address, MintPair, SwapDirection};
///
/// let a = Address::from_bytes([1u8; 32]);
/// let b = Address::from_bytes([2u8; 32]);
///
/// let Ok(pair) = MintPair::new(a, b) else { panic!("ordered") };
/// assert_eq!(pair.direction_for(&b), Ok(SwapDirection::BToA));
/// assert!(MintPair::new(b, a).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MintPair {
    mint_a: Address,
    mint_b: Address,
}

impl MintPair {
    /// Creates a pair from mints already in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::InvalidMintOrder`] unless `mint_a < mint_b`.
    pub fn new(mint_a: Address, mint_b: Address) -> crate::error::Result<Self> {
        if mint_a >= mint_b {
            return Err(BookError::InvalidMintOrder);
        }
        Ok(Self { mint_a, mint_b })
    }

    /// Returns asset A.
    #[must_use]
    pub const fn mint_a(&self) -> Address {
        self.mint_a
    }

    /// Returns asset B.
    #[must_use]
    pub const fn mint_b(&self) -> Address {
        self.mint_b
    }

    /// Returns `true` if `mint` is one of the pair's assets.
    #[must_use]
    pub fn contains(&self, mint: &Address) -> bool {
        self.mint_a == *mint || self.mint_b == *mint
    }

    /// Resolves the swap direction implied by paying in `mint_in`.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::InvalidMint`] if `mint_in` is not in the pair.
    pub fn direction_for(&self, mint_in: &Address) -> crate::error::Result<SwapDirection> {
        if *mint_in == self.mint_a {
            Ok(SwapDirection::AToB)
        } else if *mint_in == self.mint_b {
            Ok(SwapDirection::BToA)
        } else {
            Err(BookError::InvalidMint)
        }
    }
}
