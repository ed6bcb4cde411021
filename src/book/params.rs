//! Inputs of the liquidity and swap operations.
//!
//! Bin lists are the bins the caller names for the call.  For liquidity
//! operations they must be exactly the position's range in ascending
//! order; for swaps they are the walk, starting at the active bin.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, Liquidity, PoolId, PositionId};

/// Deposit uniform liquidity into every bin of a position's range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityParams {
    /// Caller; must own the position and hold its ownership token.
    pub owner: Address,
    /// Pool of the position.
    pub pool: PoolId,
    /// Position to grow.
    pub position: PositionId,
    /// Liquidity added to each bin.
    pub liquidity_per_bin: Liquidity,
    /// Most asset A the caller will pay.
    pub max_amount_a: Amount,
    /// Most asset B the caller will pay.
    pub max_amount_b: Amount,
    /// The position's bins, ascending.
    pub bins: Vec<i32>,
}

/// Withdraw liquidity from a position's range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityParams {
    /// Caller; must own the position and hold its ownership token.
    pub owner: Address,
    /// Pool of the position.
    pub pool: PoolId,
    /// Position to shrink.
    pub position: PositionId,
    /// Total liquidity to remove, rounded down to a multiple of the bin count.
    pub liquidity: Liquidity,
    /// Least asset A principal the caller accepts.
    pub min_amount_a: Amount,
    /// Least asset B principal the caller accepts.
    pub min_amount_b: Amount,
    /// The position's bins, ascending.
    pub bins: Vec<i32>,
}

/// Move all of a position's liquidity to a new range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyLiquidityParams {
    /// Caller; must own the position and hold its ownership token.
    pub owner: Address,
    /// Pool of the position.
    pub pool: PoolId,
    /// Position to empty.
    pub position: PositionId,
    /// Lower bin of the new range.
    pub new_lower_bin_id: i32,
    /// Upper bin of the new range.
    pub new_upper_bin_id: i32,
    /// Least asset A surplus the caller accepts back.
    pub min_surplus_a_out: Amount,
    /// Least asset B surplus the caller accepts back.
    pub min_surplus_b_out: Amount,
    /// The old position's bins, ascending.
    pub old_bins: Vec<i32>,
    /// The new range's bins, ascending.
    pub new_bins: Vec<i32>,
}

/// Trade an exact input amount across bins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    /// Trader paying the input and receiving the output.
    pub trader: Address,
    /// Pool to trade against.
    pub pool: PoolId,
    /// Mint paid in; selects the direction.
    pub mint_in: Address,
    /// Input, fee included.
    pub amount_in: Amount,
    /// Least output the trader accepts.
    pub min_amount_out: Amount,
    /// Bins to walk, starting at the active bin.
    pub bins: Vec<i32>,
}
