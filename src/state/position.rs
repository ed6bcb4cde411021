//! A liquidity provider's claim over a bin range.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, BinRange, Liquidity, PoolId, PositionId};

/// An LP position: uniform liquidity over every bin of its range plus the
/// fee-growth snapshot taken at the last settlement.
///
/// `liquidity` is always a multiple of the range's bin count; each bin
/// holds `liquidity / bin_count` of it.  The snapshots are the sum of the
/// range's per-bin accumulators, which settles exactly because the share
/// is the same in every bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    id: PositionId,
    pool: PoolId,
    owner: Address,
    range: BinRange,
    liquidity: Liquidity,
    fee_growth_snapshot_a: u128,
    fee_growth_snapshot_b: u128,
    ownership_token: Option<Address>,
}

impl Position {
    pub(crate) const fn new(
        id: PositionId,
        pool: PoolId,
        owner: Address,
        range: BinRange,
        snapshot: (u128, u128),
    ) -> Self {
        Self {
            id,
            pool,
            owner,
            range,
            liquidity: Liquidity::ZERO,
            fee_growth_snapshot_a: snapshot.0,
            fee_growth_snapshot_b: snapshot.1,
            ownership_token: None,
        }
    }

    /// Position identifier.
    #[must_use]
    pub const fn id(&self) -> PositionId {
        self.id
    }

    /// Pool the position belongs to.
    #[must_use]
    pub const fn pool(&self) -> PoolId {
        self.pool
    }

    /// Recorded owner; follows the ownership token when its holder acts.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Covered bins.
    #[must_use]
    pub const fn range(&self) -> BinRange {
        self.range
    }

    /// Total liquidity across the range.
    #[must_use]
    pub const fn liquidity(&self) -> Liquidity {
        self.liquidity
    }

    /// Liquidity held in each bin of the range.
    #[must_use]
    pub const fn liquidity_per_bin(&self) -> Liquidity {
        // bin_count is never zero for a valid range.
        match self.liquidity.per_bin(self.range.bin_count()) {
            Some(l) => l,
            None => Liquidity::ZERO,
        }
    }

    /// Range-summed asset A fee growth at the last settlement.
    #[must_use]
    pub const fn fee_growth_snapshot_a(&self) -> u128 {
        self.fee_growth_snapshot_a
    }

    /// Range-summed asset B fee growth at the last settlement.
    #[must_use]
    pub const fn fee_growth_snapshot_b(&self) -> u128 {
        self.fee_growth_snapshot_b
    }

    /// Ownership token, `None` only while the opening operation is staged.
    #[must_use]
    pub const fn ownership_token(&self) -> Option<Address> {
        self.ownership_token
    }

    pub(crate) fn set_owner(&mut self, owner: Address) {
        self.owner = owner;
    }

    pub(crate) fn set_liquidity(&mut self, liquidity: Liquidity) {
        self.liquidity = liquidity;
    }

    pub(crate) fn stamp_snapshot(&mut self, snapshot: (u128, u128)) {
        self.fee_growth_snapshot_a = snapshot.0;
        self.fee_growth_snapshot_b = snapshot.1;
    }

    pub(crate) fn set_ownership_token(&mut self, token: Address) {
        self.ownership_token = Some(token);
    }
}
