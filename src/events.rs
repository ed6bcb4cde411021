//! Events published by committed operations.
//!
//! Each operation buffers its events in its working set; they become
//! visible through [`LiquidityBook::drain_events`](crate::LiquidityBook::drain_events)
//! only if the operation commits.  Events serialize with a `kind` tag so a
//! host can forward them as JSON.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Address, Amount, BasisPoints, BinId, Liquidity, PoolId, PositionId, Price, SwapDirection,
};

/// A committed state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookEvent {
    /// A pool was created.
    PoolInitialized {
        pool: PoolId,
        mint_a: Address,
        mint_b: Address,
        bin_step: BasisPoints,
        fee_rate: BasisPoints,
        active_bin_id: BinId,
    },
    /// A bin was created.
    BinInitialized {
        pool: PoolId,
        bin_id: BinId,
        price: Price,
    },
    /// An empty position was opened.
    PositionOpened {
        pool: PoolId,
        position: PositionId,
        owner: Address,
        lower_bin_id: BinId,
        upper_bin_id: BinId,
    },
    /// Liquidity was deposited into a position's range.
    LiquidityAdded {
        pool: PoolId,
        position: PositionId,
        liquidity: Liquidity,
        amount_a: Amount,
        amount_b: Amount,
    },
    /// Liquidity was withdrawn from a position's range.
    LiquidityRemoved {
        pool: PoolId,
        position: PositionId,
        liquidity: Liquidity,
        amount_a: Amount,
        amount_b: Amount,
    },
    /// Accrued swap fees were paid to a position's owner.
    FeesClaimed {
        pool: PoolId,
        position: PositionId,
        owner: Address,
        fee_a: Amount,
        fee_b: Amount,
    },
    /// A swap was executed.
    Swapped {
        pool: PoolId,
        trader: Address,
        direction: SwapDirection,
        amount_in: Amount,
        fee: Amount,
        amount_out: Amount,
        start_bin_id: BinId,
        end_bin_id: BinId,
    },
    /// An empty position was retired and its ownership token burned.
    PositionBurned {
        pool: PoolId,
        position: PositionId,
        owner: Address,
    },
    /// A position's liquidity was moved to a new range.
    LiquidityRebalanced {
        pool: PoolId,
        owner: Address,
        old_position: PositionId,
        new_position: PositionId,
        liquidity_moved: Liquidity,
        new_lower_bin_id: BinId,
        new_upper_bin_id: BinId,
    },
}

impl BookEvent {
    /// Pool the event belongs to.
    #[must_use]
    pub const fn pool(&self) -> PoolId {
        match self {
            Self::PoolInitialized { pool, .. }
            | Self::BinInitialized { pool, .. }
            | Self::PositionOpened { pool, .. }
            | Self::LiquidityAdded { pool, .. }
            | Self::LiquidityRemoved { pool, .. }
            | Self::FeesClaimed { pool, .. }
            | Self::Swapped { pool, .. }
            | Self::PositionBurned { pool, .. }
            | Self::LiquidityRebalanced { pool, .. } => *pool,
        }
    }
}
