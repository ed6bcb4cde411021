//! Asset custody seam.
//!
//! The book never moves assets itself.  It asks an [`AssetTransfer`]
//! implementation for one vault per pool asset at pool creation, and at the
//! end of every operation hands it the whole batch of staged transfers.
//!
//! # Atomicity Contract
//!
//! [`AssetTransfer::settle`] executes the batch all-or-nothing: on error no
//! transfer of the batch may have taken effect.  The book commits its own
//! state only after `settle` returns `Ok`, so a rejected batch leaves both
//! sides unchanged.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, PoolId};
use crate::error::BookError;

/// A single movement of `amount` of `mint` from one holder to another.
///
/// One side of every transfer staged by the book is a pool vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    /// Asset moved.
    pub mint: Address,
    /// Holder debited.
    pub from: Address,
    /// Holder credited.
    pub to: Address,
    /// Amount moved.
    pub amount: Amount,
}

/// Token custody used by the book.
pub trait AssetTransfer {
    /// Creates (or returns) the vault holding `mint` for `pool`.
    fn open_vault(&mut self, pool: PoolId, mint: Address) -> Address;

    /// Executes a batch of transfers atomically.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidVault`] if a transfer names a vault that does
    ///   not exist or holds a different mint.
    /// - [`BookError::TransferFailed`] if a debited holder lacks funds.
    fn settle(&mut self, batch: &[Transfer]) -> Result<(), BookError>;
}
