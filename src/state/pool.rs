//! Per-pair pool state.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, BasisPoints, BinId, MintPair, PoolId, SwapDirection};
use crate::error::BookError;
use crate::math::CheckedArithmetic;

/// Global state of one asset pair.
///
/// `bin_step` and `fee_rate` never change after creation.  The reserve
/// totals always equal the sum of the bins' reserves plus the fee reserve
/// still owed to positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    id: PoolId,
    mints: MintPair,
    vault_a: Address,
    vault_b: Address,
    bin_step: BasisPoints,
    fee_rate: BasisPoints,
    active_bin_id: BinId,
    reserves_a: Amount,
    reserves_b: Amount,
    fee_reserve_a: Amount,
    fee_reserve_b: Amount,
}

impl Pool {
    pub(crate) const fn new(
        id: PoolId,
        mints: MintPair,
        vaults: (Address, Address),
        bin_step: BasisPoints,
        fee_rate: BasisPoints,
        active_bin_id: BinId,
    ) -> Self {
        Self {
            id,
            mints,
            vault_a: vaults.0,
            vault_b: vaults.1,
            bin_step,
            fee_rate,
            active_bin_id,
            reserves_a: Amount::ZERO,
            reserves_b: Amount::ZERO,
            fee_reserve_a: Amount::ZERO,
            fee_reserve_b: Amount::ZERO,
        }
    }

    /// Pool identifier.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// The pool's canonically ordered mints.
    #[must_use]
    pub const fn mints(&self) -> MintPair {
        self.mints
    }

    /// Vault holding asset A.
    #[must_use]
    pub const fn vault_a(&self) -> Address {
        self.vault_a
    }

    /// Vault holding asset B.
    #[must_use]
    pub const fn vault_b(&self) -> Address {
        self.vault_b
    }

    /// Bin width in basis points.
    #[must_use]
    pub const fn bin_step(&self) -> BasisPoints {
        self.bin_step
    }

    /// Swap fee in basis points.
    #[must_use]
    pub const fn fee_rate(&self) -> BasisPoints {
        self.fee_rate
    }

    /// Bin currently defining the trading price.
    #[must_use]
    pub const fn active_bin_id(&self) -> BinId {
        self.active_bin_id
    }

    /// Total asset A held for the pool.
    #[must_use]
    pub const fn reserves_a(&self) -> Amount {
        self.reserves_a
    }

    /// Total asset B held for the pool.
    #[must_use]
    pub const fn reserves_b(&self) -> Amount {
        self.reserves_b
    }

    /// Asset A swap fees not yet paid to positions.
    #[must_use]
    pub const fn fee_reserve_a(&self) -> Amount {
        self.fee_reserve_a
    }

    /// Asset B swap fees not yet paid to positions.
    #[must_use]
    pub const fn fee_reserve_b(&self) -> Amount {
        self.fee_reserve_b
    }

    /// `(mint, vault)` of the asset paid in by `direction`.
    #[must_use]
    pub const fn input_side(&self, direction: SwapDirection) -> (Address, Address) {
        match direction {
            SwapDirection::AToB => (self.mints.mint_a(), self.vault_a),
            SwapDirection::BToA => (self.mints.mint_b(), self.vault_b),
        }
    }

    /// `(mint, vault)` of the asset paid out by `direction`.
    #[must_use]
    pub const fn output_side(&self, direction: SwapDirection) -> (Address, Address) {
        match direction {
            SwapDirection::AToB => (self.mints.mint_b(), self.vault_b),
            SwapDirection::BToA => (self.mints.mint_a(), self.vault_a),
        }
    }

    pub(crate) fn set_active_bin(&mut self, bin: BinId) {
        self.active_bin_id = bin;
    }

    /// Records principal entering the pool.
    pub(crate) fn credit(&mut self, amount_a: Amount, amount_b: Amount) -> Result<(), BookError> {
        self.reserves_a = self.reserves_a.safe_add(&amount_a)?;
        self.reserves_b = self.reserves_b.safe_add(&amount_b)?;
        Ok(())
    }

    /// Records principal leaving the pool.
    pub(crate) fn debit(&mut self, amount_a: Amount, amount_b: Amount) -> Result<(), BookError> {
        self.reserves_a = self.reserves_a.safe_sub(&amount_a)?;
        self.reserves_b = self.reserves_b.safe_sub(&amount_b)?;
        Ok(())
    }

    /// Records a swap: input (fee included) enters, output leaves, and the
    /// fee is set aside for positions.
    pub(crate) fn record_swap(
        &mut self,
        direction: SwapDirection,
        amount_in: Amount,
        fee: Amount,
        amount_out: Amount,
    ) -> Result<(), BookError> {
        match direction {
            SwapDirection::AToB => {
                self.reserves_a = self.reserves_a.safe_add(&amount_in)?;
                self.fee_reserve_a = self.fee_reserve_a.safe_add(&fee)?;
                self.reserves_b = self.reserves_b.safe_sub(&amount_out)?;
            }
            SwapDirection::BToA => {
                self.reserves_b = self.reserves_b.safe_add(&amount_in)?;
                self.fee_reserve_b = self.fee_reserve_b.safe_add(&fee)?;
                self.reserves_a = self.reserves_a.safe_sub(&amount_out)?;
            }
        }
        Ok(())
    }

    /// Records settled fees leaving the pool.
    pub(crate) fn pay_fees(&mut self, fee_a: Amount, fee_b: Amount) -> Result<(), BookError> {
        self.fee_reserve_a = self.fee_reserve_a.safe_sub(&fee_a)?;
        self.fee_reserve_b = self.fee_reserve_b.safe_sub(&fee_b)?;
        self.debit(fee_a, fee_b)
    }
}
