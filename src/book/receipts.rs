//! Values returned by liquidity operations.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Liquidity, PositionId};
use crate::state::Position;

/// Fees paid to a position's owner by one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeePayout {
    /// Asset A fees paid.
    pub fee_a: Amount,
    /// Asset B fees paid.
    pub fee_b: Amount,
}

impl FeePayout {
    /// Returns `true` if nothing was paid.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.fee_a.is_zero() && self.fee_b.is_zero()
    }
}

/// Outcome of adding liquidity to or removing it from a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityReceipt {
    /// Position changed.
    pub position: PositionId,
    /// Liquidity added or removed across the whole range.
    pub liquidity: Liquidity,
    /// Asset A deposited or released.
    pub amount_a: Amount,
    /// Asset B deposited or released.
    pub amount_b: Amount,
    /// Fees settled before the change.
    pub fees: FeePayout,
}

/// Outcome of moving a position's liquidity to a new range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rebalance {
    /// Position emptied by the move; it stays open with zero liquidity.
    pub old_position: PositionId,
    /// Position opened over the new range.
    pub new_position: Position,
    /// Liquidity withdrawn from the old position.
    pub liquidity_moved: Liquidity,
    /// Per-bin liquidity of the new position.
    pub liquidity_per_bin: Liquidity,
    /// Asset A released from the old range.
    pub released_a: Amount,
    /// Asset B released from the old range.
    pub released_b: Amount,
    /// Asset A deposited into the new range.
    pub deposited_a: Amount,
    /// Asset B deposited into the new range.
    pub deposited_b: Amount,
    /// Asset A returned to the owner.
    pub surplus_a: Amount,
    /// Asset B returned to the owner.
    pub surplus_b: Amount,
    /// Fees settled on the old position.
    pub fees: FeePayout,
}
