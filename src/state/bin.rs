//! Per-price liquidity cell.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, BinId, Liquidity, PoolId, Price, SwapDirection};
use crate::error::BookError;
use crate::math::CheckedArithmetic;

/// One price bin of a pool.
///
/// A bin trades at its fixed [`Price`] and holds its own reserves of both
/// assets.  `liquidity` is the sum of the per-bin shares of every position
/// covering the bin, and the fee-growth accumulators (scaled by
/// [`PRECISION`](crate::math::PRECISION)) only ever increase.  A bin with
/// zero liquidity holds zero reserves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBin {
    pool: PoolId,
    bin_id: BinId,
    price: Price,
    liquidity: Liquidity,
    reserve_a: Amount,
    reserve_b: Amount,
    fee_growth_per_unit_a: u128,
    fee_growth_per_unit_b: u128,
}

impl PriceBin {
    /// Creates an empty bin.
    #[must_use]
    pub const fn new(pool: PoolId, bin_id: BinId, price: Price) -> Self {
        Self {
            pool,
            bin_id,
            price,
            liquidity: Liquidity::ZERO,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            fee_growth_per_unit_a: 0,
            fee_growth_per_unit_b: 0,
        }
    }

    /// Pool the bin belongs to.
    #[must_use]
    pub const fn pool(&self) -> PoolId {
        self.pool
    }

    /// Bin index.
    #[must_use]
    pub const fn bin_id(&self) -> BinId {
        self.bin_id
    }

    /// Fixed trading price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Total liquidity resident in the bin.
    #[must_use]
    pub const fn liquidity(&self) -> Liquidity {
        self.liquidity
    }

    /// Asset A held by the bin.
    #[must_use]
    pub const fn reserve_a(&self) -> Amount {
        self.reserve_a
    }

    /// Asset B held by the bin.
    #[must_use]
    pub const fn reserve_b(&self) -> Amount {
        self.reserve_b
    }

    /// Accumulated asset A fees per unit of liquidity.
    #[must_use]
    pub const fn fee_growth_per_unit_a(&self) -> u128 {
        self.fee_growth_per_unit_a
    }

    /// Accumulated asset B fees per unit of liquidity.
    #[must_use]
    pub const fn fee_growth_per_unit_b(&self) -> u128 {
        self.fee_growth_per_unit_b
    }

    /// Reserve of the asset a trade in `direction` takes out of the bin.
    #[must_use]
    pub const fn reserve_out(&self, direction: SwapDirection) -> Amount {
        match direction {
            SwapDirection::AToB => self.reserve_b,
            SwapDirection::BToA => self.reserve_a,
        }
    }

    /// Adds liquidity together with the assets that back it.
    pub(crate) fn deposit(
        &mut self,
        liquidity: Liquidity,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<(), BookError> {
        self.liquidity = self.liquidity.safe_add(&liquidity)?;
        self.reserve_a = self.reserve_a.safe_add(&amount_a)?;
        self.reserve_b = self.reserve_b.safe_add(&amount_b)?;
        Ok(())
    }

    /// Removes liquidity together with the assets it releases.
    pub(crate) fn withdraw(
        &mut self,
        liquidity: Liquidity,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<(), BookError> {
        self.liquidity = self.liquidity.safe_sub(&liquidity)?;
        self.reserve_a = self.reserve_a.safe_sub(&amount_a)?;
        self.reserve_b = self.reserve_b.safe_sub(&amount_b)?;
        if self.liquidity.is_zero() && !(self.reserve_a.is_zero() && self.reserve_b.is_zero()) {
            return Err(BookError::MathOverflow("empty bin left holding reserves"));
        }
        Ok(())
    }

    /// Applies one swap step: `amount_in` enters, `amount_out` leaves.
    pub(crate) fn trade(
        &mut self,
        direction: SwapDirection,
        amount_in: Amount,
        amount_out: Amount,
    ) -> Result<(), BookError> {
        match direction {
            SwapDirection::AToB => {
                self.reserve_a = self.reserve_a.safe_add(&amount_in)?;
                self.reserve_b = self.reserve_b.safe_sub(&amount_out)?;
            }
            SwapDirection::BToA => {
                self.reserve_b = self.reserve_b.safe_add(&amount_in)?;
                self.reserve_a = self.reserve_a.safe_sub(&amount_out)?;
            }
        }
        Ok(())
    }

    /// Advances the accumulator of the asset paid in by `direction`.
    pub(crate) fn accrue_fee_growth(
        &mut self,
        direction: SwapDirection,
        delta: u128,
    ) -> Result<(), BookError> {
        let slot = match direction {
            SwapDirection::AToB => &mut self.fee_growth_per_unit_a,
            SwapDirection::BToA => &mut self.fee_growth_per_unit_b,
        };
        *slot = slot.safe_add(&delta)?;
        Ok(())
    }
}
