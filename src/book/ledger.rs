//! The ledger facade owning pools, bins, positions and collaborators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::params::{AddLiquidityParams, ModifyLiquidityParams, RemoveLiquidityParams, SwapParams};
use super::receipts::{FeePayout, LiquidityReceipt, Rebalance};
use super::working_set::WorkingSet;
use super::{fees, liquidity, swap};
use crate::config::{BookConfig, PoolConfig};
use crate::domain::{
    Address, Amount, BasisPoints, BinId, BinRange, Liquidity, MintPair, PoolId, PositionId, Price,
    SwapDirection, SwapOutcome,
};
use crate::error::BookError;
use crate::events::BookEvent;
use crate::math::{CheckedArithmetic, price_at_bin};
use crate::services::{MemoryLedger, MemoryRegistry};
use crate::state::{Pool, Position, PriceBin};
use crate::traits::{AssetTransfer, OwnershipRegistry};

/// Serializable copy of every pool, bin and position in a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Pools ordered by id.
    pub pools: Vec<Pool>,
    /// Bins ordered by pool, then bin id.
    pub bins: Vec<PriceBin>,
    /// Positions ordered by id.
    pub positions: Vec<Position>,
}

/// A discretized-liquidity market: every pool, bin and position, plus the
/// custody and ownership services the operations drive.
///
/// Every mutating operation is one transaction: it stages its changes in a
/// working set, settles the resulting transfer batch through `T`, and only
/// then writes the staged state back.  An operation that returns an error
/// leaves the book exactly as it was.
///
/// # Examples
///
/// ```
/// use liquidity_book::config::{BookConfig, PoolConfig};
/// use liquidity_book::domain::{Address, BasisPoints};
/// use liquidity_book::LiquidityBook;
///
/// let mut book = LiquidityBook::in_memory(BookConfig::default());
/// let config = PoolConfig::new(
///     Address::from_bytes([1u8; 32]),
///     Address::from_bytes([2u8; 32]),
///     BasisPoints::new(20),
///     BasisPoints::new(50),
///     0,
/// );
/// let Ok(pool) = book.initialize_pool(config) else { panic!("valid pool") };
/// assert!(book.initialize_bin(pool.id(), 20).is_ok());
/// assert!(book.initialize_pool(config).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct LiquidityBook<T = MemoryLedger, R = MemoryRegistry> {
    config: BookConfig,
    pools: BTreeMap<PoolId, Pool>,
    pairs: BTreeMap<MintPair, PoolId>,
    bins: BTreeMap<(PoolId, BinId), PriceBin>,
    positions: BTreeMap<PositionId, Position>,
    next_pool_id: u64,
    next_position_id: u64,
    events: Vec<BookEvent>,
    transfers: T,
    registry: R,
}

impl LiquidityBook<MemoryLedger, MemoryRegistry> {
    /// Creates a book backed by the in-memory services.
    #[must_use]
    pub fn in_memory(config: BookConfig) -> Self {
        Self::new(config, MemoryLedger::new(), MemoryRegistry::new())
    }
}

impl<T: AssetTransfer, R: OwnershipRegistry> LiquidityBook<T, R> {
    /// Creates an empty book.
    pub fn new(config: BookConfig, transfers: T, registry: R) -> Self {
        Self {
            config,
            pools: BTreeMap::new(),
            pairs: BTreeMap::new(),
            bins: BTreeMap::new(),
            positions: BTreeMap::new(),
            next_pool_id: 1,
            next_position_id: 1,
            events: Vec::new(),
            transfers,
            registry,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Book-wide configuration.
    #[must_use]
    pub const fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Pool by id.
    #[must_use]
    pub fn pool(&self, id: PoolId) -> Option<&Pool> {
        self.pools.get(&id)
    }

    /// Pool trading `mint_a` against `mint_b`, in canonical order.
    #[must_use]
    pub fn pool_for_pair(&self, mint_a: Address, mint_b: Address) -> Option<&Pool> {
        let pair = MintPair::new(mint_a, mint_b).ok()?;
        self.pairs.get(&pair).and_then(|id| self.pools.get(id))
    }

    /// Bin `bin_id` of `pool`, if initialized.
    #[must_use]
    pub fn bin(&self, pool: PoolId, bin_id: i32) -> Option<&PriceBin> {
        let id = BinId::new(bin_id).ok()?;
        self.bins.get(&(pool, id))
    }

    /// Initialized bins of `pool`, ascending.
    pub fn bins(&self, pool: PoolId) -> impl Iterator<Item = &PriceBin> {
        self.bins
            .range((pool, BinId::MIN)..=(pool, BinId::MAX))
            .map(|(_, bin)| bin)
    }

    /// Position by id.
    #[must_use]
    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id)
    }

    /// Positions recorded as owned by `owner`.
    pub fn positions_of(&self, owner: Address) -> impl Iterator<Item = &Position> {
        self.positions
            .values()
            .filter(move |position| position.owner() == owner)
    }

    /// Custody service.
    #[must_use]
    pub const fn transfers(&self) -> &T {
        &self.transfers
    }

    /// Custody service, mutably (funding accounts in tests and demos).
    pub fn transfers_mut(&mut self) -> &mut T {
        &mut self.transfers
    }

    /// Ownership-token service.
    #[must_use]
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Ownership-token service, mutably.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Takes every event published since the last drain.
    pub fn drain_events(&mut self) -> Vec<BookEvent> {
        std::mem::take(&mut self.events)
    }

    /// Copies the whole ledger state.
    #[must_use]
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            pools: self.pools.values().cloned().collect(),
            bins: self.bins.values().cloned().collect(),
            positions: self.positions.values().cloned().collect(),
        }
    }

    /// Returns `true` if the pool's reserve totals equal its bins' reserves
    /// plus its fee reserve, for both assets.
    #[must_use]
    pub fn reserves_balanced(&self, pool: PoolId) -> bool {
        let Some(state) = self.pools.get(&pool) else {
            return false;
        };
        let (sum_a, sum_b) = self.bins(pool).fold((0u128, 0u128), |(a, b), bin| {
            (a + bin.reserve_a().as_u128(), b + bin.reserve_b().as_u128())
        });
        sum_a + state.fee_reserve_a().as_u128() == state.reserves_a().as_u128()
            && sum_b + state.fee_reserve_b().as_u128() == state.reserves_b().as_u128()
    }

    /// Fixed price of `bin_id` in `pool`.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidPool`] if the pool does not exist.
    /// - [`BookError::InvalidBinId`] if the id is out of range, misaligned,
    ///   or has no representable price.
    pub fn get_price(&self, pool: PoolId, bin_id: i32) -> Result<Price, BookError> {
        let state = self.pools.get(&pool).ok_or(BookError::InvalidPool)?;
        let id = Self::aligned_bin(state.bin_step(), bin_id)?;
        match self.bins.get(&(pool, id)) {
            Some(bin) => Ok(bin.price()),
            None => price_at_bin(id, state.bin_step()),
        }
    }

    /// Ids of the bins from `lower` to `upper` in `pool`'s bin step.
    ///
    /// # Errors
    ///
    /// Same as [`open_position`](Self::open_position) range validation.
    pub fn range_ids(&self, pool: PoolId, lower: i32, upper: i32) -> Result<Vec<i32>, BookError> {
        let state = self.pools.get(&pool).ok_or(BookError::InvalidPool)?;
        let range = self.range(state.bin_step(), lower, upper)?;
        Ok(range.iter().map(|id| id.get()).collect())
    }

    /// Initialized bins a swap paying `mint_in` would walk, starting at the
    /// active bin, at most `max_bins` long.
    ///
    /// # Errors
    ///
    /// [`BookError::InvalidPool`] or [`BookError::InvalidMint`].
    pub fn swap_path(
        &self,
        pool: PoolId,
        mint_in: Address,
        max_bins: usize,
    ) -> Result<Vec<i32>, BookError> {
        let state = self.pools.get(&pool).ok_or(BookError::InvalidPool)?;
        let direction = state.mints().direction_for(&mint_in)?;
        let mut path = Vec::new();
        let mut next = Some(state.active_bin_id());
        while let Some(id) = next {
            if path.len() >= max_bins || !self.bins.contains_key(&(pool, id)) {
                break;
            }
            path.push(id.get());
            next = id.stepped(direction.walk_sign(), state.bin_step());
        }
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Pool and bin lifecycle
    // -----------------------------------------------------------------------

    /// Creates the pool for a new asset pair and opens its vaults.
    ///
    /// # Errors
    ///
    /// - Any [`PoolConfig::validate`] error.
    /// - [`BookError::PoolAlreadyExists`] if the pair already has a pool.
    pub fn initialize_pool(&mut self, config: PoolConfig) -> Result<Pool, BookError> {
        let (mints, active) = config.resolve(&self.config)?;
        if self.pairs.contains_key(&mints) {
            return Err(BookError::PoolAlreadyExists);
        }

        let id = PoolId::new(self.next_pool_id);
        self.next_pool_id += 1;
        let vault_a = self.transfers.open_vault(id, mints.mint_a());
        let vault_b = self.transfers.open_vault(id, mints.mint_b());
        let pool = Pool::new(
            id,
            mints,
            (vault_a, vault_b),
            config.bin_step,
            config.fee_rate,
            active,
        );

        self.pools.insert(id, pool.clone());
        self.pairs.insert(mints, id);
        self.events.push(BookEvent::PoolInitialized {
            pool: id,
            mint_a: mints.mint_a(),
            mint_b: mints.mint_b(),
            bin_step: config.bin_step,
            fee_rate: config.fee_rate,
            active_bin_id: active,
        });
        info!(
            pool = %id,
            bin_step = %config.bin_step,
            fee_rate = %config.fee_rate,
            active_bin = active.get(),
            "pool initialized"
        );
        Ok(pool)
    }

    /// Creates bin `bin_id` of `pool`; returns the existing bin if present.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidPool`] if the pool does not exist.
    /// - [`BookError::InvalidBinId`] if the id is out of range, misaligned,
    ///   or has no representable price.
    pub fn initialize_bin(&mut self, pool: PoolId, bin_id: i32) -> Result<PriceBin, BookError> {
        let state = self.pools.get(&pool).ok_or(BookError::InvalidPool)?;
        let id = Self::aligned_bin(state.bin_step(), bin_id)?;
        if let Some(existing) = self.bins.get(&(pool, id)) {
            return Ok(existing.clone());
        }
        let price = price_at_bin(id, state.bin_step())?;
        let bin = PriceBin::new(pool, id, price);
        self.bins.insert((pool, id), bin.clone());
        self.events.push(BookEvent::BinInitialized {
            pool,
            bin_id: id,
            price,
        });
        debug!(pool = %pool, bin = id.get(), price = %price, "bin initialized");
        Ok(bin)
    }

    // -----------------------------------------------------------------------
    // Positions
    // -----------------------------------------------------------------------

    /// Opens an empty position over `[lower, upper]` and mints its
    /// ownership token to `owner`.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidPool`] if the pool does not exist.
    /// - [`BookError::InvalidBinRange`] if the range is inverted, empty,
    ///   misaligned, or out of bounds.
    /// - [`BookError::RangeTooWide`] if it spans too many bins.
    /// - [`BookError::InvalidBinAccount`] if a bin of the range is not
    ///   initialized.
    pub fn open_position(
        &mut self,
        owner: Address,
        pool: PoolId,
        lower: i32,
        upper: i32,
    ) -> Result<Position, BookError> {
        let step = self
            .pools
            .get(&pool)
            .ok_or(BookError::InvalidPool)?
            .bin_step();
        let range = self.range(step, lower, upper)?;

        let mut ws = self.stage(pool)?;
        ws.stage_bins(&self.bins, range.iter())?;
        let snapshot = fees::range_fee_growth(&ws, &range)?;
        let id = ws.allocate_position_id();
        ws.stage_position(Position::new(id, pool, owner, range, snapshot));
        ws.pending_tokens.push(id);
        ws.emit(BookEvent::PositionOpened {
            pool,
            position: id,
            owner,
            lower_bin_id: range.lower(),
            upper_bin_id: range.upper(),
        });
        self.commit(ws)?;

        info!(
            pool = %pool,
            position = %id,
            owner = %owner,
            lower = range.lower().get(),
            upper = range.upper().get(),
            "position opened"
        );
        self.positions
            .get(&id)
            .cloned()
            .ok_or(BookError::PositionNotFound)
    }

    /// Deposits uniform liquidity into every bin of a position's range.
    ///
    /// Accrued fees are settled and paid first.
    ///
    /// # Errors
    ///
    /// - [`BookError::Unauthorized`], [`BookError::InvalidPool`] or
    ///   [`BookError::PositionNotFound`] for a bad caller or position.
    /// - [`BookError::ZeroLiquidity`] if `liquidity_per_bin` is zero.
    /// - [`BookError::InvalidBinCount`] / [`BookError::InvalidBinAccount`]
    ///   if `bins` is not the position's range.
    /// - [`BookError::SlippageExceeded`] if the cost exceeds the maxima.
    /// - [`BookError::MathOverflow`] on overflow.
    /// - [`BookError::TransferFailed`] if the owner cannot pay.
    pub fn add_liquidity(
        &mut self,
        params: &AddLiquidityParams,
    ) -> Result<LiquidityReceipt, BookError> {
        let position = self.authorized(params.owner, params.pool, params.position)?;
        if params.liquidity_per_bin.is_zero() {
            return Err(BookError::ZeroLiquidity);
        }
        let range = position.range();
        Self::expect_range(&range, &params.bins)?;
        let added = params
            .liquidity_per_bin
            .checked_mul_count(range.bin_count())
            .ok_or(BookError::MathOverflow("position liquidity"))?;
        let total = position.liquidity().safe_add(&added)?;

        let mut ws = self.stage(params.pool)?;
        ws.stage_bins(&self.bins, range.iter())?;
        ws.stage_position(position.clone());
        let fees = fees::settle(&mut ws, position.id())?;
        let (amount_a, amount_b) = liquidity::deposit(&mut ws, &range, params.liquidity_per_bin)?;
        if amount_a > params.max_amount_a || amount_b > params.max_amount_b {
            return Err(BookError::SlippageExceeded);
        }
        ws.position_mut(position.id())?.set_liquidity(total);
        ws.collect(params.owner, amount_a, amount_b);
        ws.emit(BookEvent::LiquidityAdded {
            pool: params.pool,
            position: position.id(),
            liquidity: added,
            amount_a,
            amount_b,
        });
        self.commit(ws)?;

        info!(
            position = %position.id(),
            liquidity = %added,
            amount_a = %amount_a,
            amount_b = %amount_b,
            "liquidity added"
        );
        Ok(LiquidityReceipt {
            position: position.id(),
            liquidity: added,
            amount_a,
            amount_b,
            fees,
        })
    }

    /// Withdraws liquidity uniformly from a position's range.
    ///
    /// The amount removed is rounded down to a multiple of the bin count.
    /// Accrued fees are settled and paid alongside the principal; the
    /// position stays open even when emptied.
    ///
    /// # Errors
    ///
    /// - [`BookError::Unauthorized`], [`BookError::InvalidPool`] or
    ///   [`BookError::PositionNotFound`] for a bad caller or position.
    /// - [`BookError::InsufficientLiquidity`] if more than the position
    ///   holds is requested.
    /// - [`BookError::ZeroLiquidity`] if the request rounds to zero.
    /// - [`BookError::InvalidBinCount`] / [`BookError::InvalidBinAccount`]
    ///   if `bins` is not the position's range.
    /// - [`BookError::SlippageExceeded`] if principal falls below a minimum.
    pub fn remove_liquidity(
        &mut self,
        params: &RemoveLiquidityParams,
    ) -> Result<LiquidityReceipt, BookError> {
        let position = self.authorized(params.owner, params.pool, params.position)?;
        if params.liquidity > position.liquidity() {
            return Err(BookError::InsufficientLiquidity);
        }
        let range = position.range();
        Self::expect_range(&range, &params.bins)?;
        let count = range.bin_count();
        let per_bin = params
            .liquidity
            .per_bin(count)
            .ok_or(BookError::InvalidBinCount)?;
        if per_bin.is_zero() {
            return Err(BookError::ZeroLiquidity);
        }
        let removed = per_bin
            .checked_mul_count(count)
            .ok_or(BookError::MathOverflow("position liquidity"))?;
        let remaining = position.liquidity().safe_sub(&removed)?;

        let mut ws = self.stage(params.pool)?;
        ws.stage_bins(&self.bins, range.iter())?;
        ws.stage_position(position.clone());
        let fees = fees::settle(&mut ws, position.id())?;
        let (amount_a, amount_b) = liquidity::withdraw(&mut ws, &range, per_bin)?;
        if amount_a < params.min_amount_a || amount_b < params.min_amount_b {
            return Err(BookError::SlippageExceeded);
        }
        ws.position_mut(position.id())?.set_liquidity(remaining);
        ws.pay(params.owner, amount_a, amount_b);
        ws.emit(BookEvent::LiquidityRemoved {
            pool: params.pool,
            position: position.id(),
            liquidity: removed,
            amount_a,
            amount_b,
        });
        self.commit(ws)?;

        info!(
            position = %position.id(),
            liquidity = %removed,
            amount_a = %amount_a,
            amount_b = %amount_b,
            "liquidity removed"
        );
        Ok(LiquidityReceipt {
            position: position.id(),
            liquidity: removed,
            amount_a,
            amount_b,
            fees,
        })
    }

    /// Moves all of a position's liquidity into a new position over a new
    /// range.
    ///
    /// Fees are settled and paid out; the released principal funds the
    /// largest uniform per-bin liquidity it can over the new range, and the
    /// rest is returned.  The old position is left open and empty.  Emits
    /// exactly one [`BookEvent::LiquidityRebalanced`].
    ///
    /// # Errors
    ///
    /// - [`BookError::Unauthorized`], [`BookError::InvalidPool`] or
    ///   [`BookError::PositionNotFound`] for a bad caller or position.
    /// - [`BookError::ZeroLiquidity`] if the position is empty.
    /// - [`BookError::InvalidBinRange`] / [`BookError::RangeTooWide`] for a
    ///   bad new range.
    /// - [`BookError::InvalidBinCount`] / [`BookError::InvalidBinAccount`]
    ///   if a bin list does not match its range.
    /// - [`BookError::InsufficientLiquidity`] if the released assets cannot
    ///   fund a single unit per bin.
    /// - [`BookError::SlippageExceeded`] if a surplus falls below its minimum.
    pub fn modify_liquidity(
        &mut self,
        params: &ModifyLiquidityParams,
    ) -> Result<Rebalance, BookError> {
        let old = self.authorized(params.owner, params.pool, params.position)?;
        if old.liquidity().is_zero() {
            return Err(BookError::ZeroLiquidity);
        }
        let step = old.range().bin_step();
        let new_range = self.range(step, params.new_lower_bin_id, params.new_upper_bin_id)?;
        let old_range = old.range();
        Self::expect_range(&old_range, &params.old_bins)?;
        Self::expect_range(&new_range, &params.new_bins)?;

        let mut ws = self.stage(params.pool)?;
        ws.stage_bins(&self.bins, old_range.iter())?;
        ws.stage_bins(&self.bins, new_range.iter())?;
        ws.stage_position(old.clone());

        let fees = fees::settle(&mut ws, old.id())?;
        let released = liquidity::withdraw(&mut ws, &old_range, old.liquidity_per_bin())?;
        ws.position_mut(old.id())?.set_liquidity(Liquidity::ZERO);

        let per_bin = liquidity::largest_fundable(&ws, &new_range, released);
        if per_bin.is_zero() {
            return Err(BookError::InsufficientLiquidity);
        }
        let deposited = liquidity::deposit(&mut ws, &new_range, per_bin)?;
        let surplus_a = released.0.safe_sub(&deposited.0)?;
        let surplus_b = released.1.safe_sub(&deposited.1)?;
        if surplus_a < params.min_surplus_a_out || surplus_b < params.min_surplus_b_out {
            return Err(BookError::SlippageExceeded);
        }

        let new_id = ws.allocate_position_id();
        let snapshot = fees::range_fee_growth(&ws, &new_range)?;
        let mut fresh = Position::new(new_id, params.pool, params.owner, new_range, snapshot);
        fresh.set_liquidity(
            per_bin
                .checked_mul_count(new_range.bin_count())
                .ok_or(BookError::MathOverflow("position liquidity"))?,
        );
        ws.stage_position(fresh);
        ws.pending_tokens.push(new_id);
        ws.pay(params.owner, surplus_a, surplus_b);
        ws.emit(BookEvent::LiquidityRebalanced {
            pool: params.pool,
            owner: params.owner,
            old_position: old.id(),
            new_position: new_id,
            liquidity_moved: old.liquidity(),
            new_lower_bin_id: new_range.lower(),
            new_upper_bin_id: new_range.upper(),
        });
        self.commit(ws)?;

        info!(
            pool = %params.pool,
            old_position = %old.id(),
            new_position = %new_id,
            liquidity_moved = %old.liquidity(),
            lower = new_range.lower().get(),
            upper = new_range.upper().get(),
            "liquidity rebalanced"
        );
        let new_position = self
            .positions
            .get(&new_id)
            .cloned()
            .ok_or(BookError::PositionNotFound)?;
        Ok(Rebalance {
            old_position: old.id(),
            new_position,
            liquidity_moved: old.liquidity(),
            liquidity_per_bin: per_bin,
            released_a: released.0,
            released_b: released.1,
            deposited_a: deposited.0,
            deposited_b: deposited.1,
            surplus_a,
            surplus_b,
            fees,
        })
    }

    /// Retires an empty position and burns its ownership token.
    ///
    /// # Errors
    ///
    /// - [`BookError::Unauthorized`], [`BookError::InvalidPool`] or
    ///   [`BookError::PositionNotFound`] for a bad caller or position.
    /// - [`BookError::PositionNotEmpty`] if it still holds liquidity.
    pub fn burn_empty_position(
        &mut self,
        owner: Address,
        pool: PoolId,
        position: PositionId,
    ) -> Result<(), BookError> {
        let state = self.authorized(owner, pool, position)?;
        if !state.liquidity().is_zero() {
            return Err(BookError::PositionNotEmpty);
        }
        let mut ws = self.stage(pool)?;
        ws.retired.push((position, state.ownership_token()));
        ws.emit(BookEvent::PositionBurned {
            pool,
            position,
            owner,
        });
        self.commit(ws)?;
        info!(pool = %pool, position = %position, "position burned");
        Ok(())
    }

    /// Pays a position the fees it has accrued without changing its
    /// liquidity.  Claiming again before another swap pays nothing.
    ///
    /// # Errors
    ///
    /// - [`BookError::Unauthorized`], [`BookError::InvalidPool`] or
    ///   [`BookError::PositionNotFound`] for a bad caller or position.
    /// - [`BookError::InvalidBinCount`] / [`BookError::InvalidBinAccount`]
    ///   if `bins` is not the position's range.
    pub fn claim_fees(
        &mut self,
        owner: Address,
        pool: PoolId,
        position: PositionId,
        bins: &[i32],
    ) -> Result<FeePayout, BookError> {
        let state = self.authorized(owner, pool, position)?;
        let range = state.range();
        Self::expect_range(&range, bins)?;
        let mut ws = self.stage(pool)?;
        ws.stage_bins(&self.bins, range.iter())?;
        ws.stage_position(state);
        let payout = fees::settle(&mut ws, position)?;
        self.commit(ws)?;
        Ok(payout)
    }

    // -----------------------------------------------------------------------
    // Swaps
    // -----------------------------------------------------------------------

    /// Trades `amount_in` of `mint_in` across the supplied bins.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidPool`] if the pool does not exist.
    /// - [`BookError::ZeroAmount`] if the input (or input net of fee) is zero.
    /// - [`BookError::InvalidMint`] if `mint_in` is not one of the pool's.
    /// - [`BookError::InvalidBinAccount`] if the path does not start at the
    ///   active bin, skips a step, or names an uninitialized bin.
    /// - [`BookError::InsufficientLiquidityForSwap`] if the path runs out.
    /// - [`BookError::SlippageExceeded`] if output is below the minimum.
    /// - [`BookError::TransferFailed`] if the trader cannot pay.
    pub fn swap(&mut self, params: &SwapParams) -> Result<SwapOutcome, BookError> {
        let (mut ws, direction) = self.stage_swap(params.pool, params.mint_in, params.amount_in)?;
        let path = Self::path_ids(&params.bins)?;
        ws.stage_bins(&self.bins, path.iter().copied())?;
        swap::validate_path(&ws, direction, &path)?;
        let outcome = swap::route(&mut ws, direction, params.amount_in, &path)?;
        if outcome.amount_out < params.min_amount_out {
            return Err(BookError::SlippageExceeded);
        }

        let (mint_in, vault_in) = ws.pool.input_side(direction);
        let (mint_out, vault_out) = ws.pool.output_side(direction);
        ws.push_transfer(mint_in, params.trader, vault_in, outcome.amount_in);
        ws.push_transfer(mint_out, vault_out, params.trader, outcome.amount_out);
        ws.emit(BookEvent::Swapped {
            pool: params.pool,
            trader: params.trader,
            direction,
            amount_in: outcome.amount_in,
            fee: outcome.fee,
            amount_out: outcome.amount_out,
            start_bin_id: outcome.start_bin,
            end_bin_id: outcome.end_bin,
        });
        self.commit(ws)?;

        info!(
            pool = %params.pool,
            direction = %direction,
            amount_in = %outcome.amount_in,
            amount_out = %outcome.amount_out,
            fee = %outcome.fee,
            active_bin = outcome.end_bin.get(),
            "swap executed"
        );
        Ok(outcome)
    }

    /// Runs a swap against a throwaway copy of the state and returns what
    /// it would produce.  Nothing is committed and no slippage bound is
    /// applied.
    ///
    /// # Errors
    ///
    /// As [`swap`](Self::swap), except `SlippageExceeded` and
    /// `TransferFailed`.
    pub fn quote_swap(
        &self,
        pool: PoolId,
        mint_in: Address,
        amount_in: Amount,
        bins: &[i32],
    ) -> Result<SwapOutcome, BookError> {
        let (mut ws, direction) = self.stage_swap(pool, mint_in, amount_in)?;
        let path = Self::path_ids(bins)?;
        ws.stage_bins(&self.bins, path.iter().copied())?;
        swap::validate_path(&ws, direction, &path)?;
        swap::route(&mut ws, direction, amount_in, &path)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn stage(&self, pool: PoolId) -> Result<WorkingSet, BookError> {
        let state = self.pools.get(&pool).ok_or(BookError::InvalidPool)?;
        Ok(WorkingSet::new(state.clone(), self.next_position_id))
    }

    fn stage_swap(
        &self,
        pool: PoolId,
        mint_in: Address,
        amount_in: Amount,
    ) -> Result<(WorkingSet, SwapDirection), BookError> {
        let ws = self.stage(pool)?;
        if amount_in.is_zero() {
            return Err(BookError::ZeroAmount);
        }
        let direction = ws.pool.mints().direction_for(&mint_in)?;
        Ok((ws, direction))
    }

    /// Resolves a caller-facing position reference and checks that the
    /// caller holds its ownership token.
    ///
    /// Returns a copy re-recorded to the caller, so a transferred token
    /// moves the position to its new holder once an operation commits.
    fn authorized(
        &self,
        caller: Address,
        pool: PoolId,
        id: PositionId,
    ) -> Result<Position, BookError> {
        if !self.pools.contains_key(&pool) {
            return Err(BookError::InvalidPool);
        }
        let position = self
            .positions
            .get(&id)
            .ok_or(BookError::PositionNotFound)?;
        if position.pool() != pool {
            return Err(BookError::InvalidPool);
        }
        let holder = position
            .ownership_token()
            .and_then(|token| self.registry.holder_of(token));
        if holder != Some(caller) {
            return Err(BookError::Unauthorized);
        }
        let mut position = position.clone();
        if position.owner() != caller {
            debug!(
                position = %id,
                from = %position.owner(),
                to = %caller,
                "owner follows ownership token"
            );
            position.set_owner(caller);
        }
        Ok(position)
    }

    fn range(&self, step: BasisPoints, lower: i32, upper: i32) -> Result<BinRange, BookError> {
        let (Ok(lower), Ok(upper)) = (BinId::new(lower), BinId::new(upper)) else {
            return Err(BookError::InvalidBinRange("bin id out of range"));
        };
        BinRange::new(lower, upper, step, self.config.max_bins_per_position())
    }

    fn aligned_bin(step: BasisPoints, bin_id: i32) -> Result<BinId, BookError> {
        let id = BinId::new(bin_id)?;
        if !id.is_aligned(step) {
            return Err(BookError::InvalidBinId(
                "bin id must be a multiple of the bin step",
            ));
        }
        Ok(id)
    }

    /// Checks that `supplied` lists exactly the bins of `range`, ascending.
    fn expect_range(range: &BinRange, supplied: &[i32]) -> Result<(), BookError> {
        if supplied.len() != range.bin_count() as usize {
            return Err(BookError::InvalidBinCount);
        }
        if range.iter().zip(supplied).any(|(expected, raw)| expected.get() != *raw) {
            return Err(BookError::InvalidBinAccount);
        }
        Ok(())
    }

    fn path_ids(raw: &[i32]) -> Result<Vec<BinId>, BookError> {
        raw.iter()
            .map(|&id| BinId::new(id).map_err(|_| BookError::InvalidBinAccount))
            .collect()
    }

    /// Settles the working set's transfers and, only if they go through,
    /// writes the staged state back and publishes its events.
    fn commit(&mut self, ws: WorkingSet) -> Result<(), BookError> {
        let WorkingSet {
            pool,
            bins,
            mut positions,
            pending_tokens,
            retired,
            transfers,
            events,
            next_position_id,
        } = ws;

        if let Err(err) = self.transfers.settle(&transfers) {
            warn!(
                pool = %pool.id(),
                transfers = transfers.len(),
                error = %err,
                "transfer batch rejected, discarding working set"
            );
            return Err(err);
        }

        for id in pending_tokens {
            if let Some(position) = positions.get_mut(&id) {
                let token = self.registry.mint(id, position.owner());
                position.set_ownership_token(token);
            }
        }
        let pool_id = pool.id();
        for (bin_id, bin) in bins {
            self.bins.insert((pool_id, bin_id), bin);
        }
        self.positions.extend(positions);
        for (id, token) in retired {
            self.positions.remove(&id);
            if let Some(token) = token {
                self.registry.burn(token);
            }
        }
        self.pools.insert(pool_id, pool);
        self.next_position_id = self.next_position_id.max(next_position_id);
        self.events.extend(events);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const MINT_A: Address = Address::from_bytes([1u8; 32]);
    const MINT_B: Address = Address::from_bytes([2u8; 32]);
    const ALICE: Address = Address::from_bytes([7u8; 32]);
    const BOB: Address = Address::from_bytes([8u8; 32]);
    const FUNDING: u64 = 10_000_000;

    // -----------------------------------------------------------------------
    // Fixture: step 20, fee 50 bp, bins -100..=100, both traders funded
    // -----------------------------------------------------------------------

    struct Fixture {
        book: LiquidityBook,
        pool: PoolId,
    }

    fn ids(lower: i32, upper: i32) -> Vec<i32> {
        (lower..=upper).step_by(20).collect()
    }

    fn fixture() -> Fixture {
        let mut book = LiquidityBook::in_memory(BookConfig::default());
        let Ok(pool) = book.initialize_pool(PoolConfig::new(
            MINT_A,
            MINT_B,
            BasisPoints::new(20),
            BasisPoints::new(50),
            0,
        )) else {
            panic!("allowed pool parameters");
        };
        for id in ids(-100, 100) {
            let Ok(_) = book.initialize_bin(pool.id(), id) else {
                panic!("aligned bin {id}");
            };
        }
        for holder in [ALICE, BOB] {
            for mint in [MINT_A, MINT_B] {
                let Ok(()) = book.transfers_mut().fund(holder, mint, Amount::new(FUNDING)) else {
                    panic!("funding fits");
                };
            }
        }
        Fixture {
            book,
            pool: pool.id(),
        }
    }

    fn provide(f: &mut Fixture, owner: Address, lower: i32, upper: i32, per_bin: u128) -> PositionId {
        let Ok(position) = f.book.open_position(owner, f.pool, lower, upper) else {
            panic!("position opens");
        };
        let Ok(_) = f.book.add_liquidity(&AddLiquidityParams {
            owner,
            pool: f.pool,
            position: position.id(),
            liquidity_per_bin: Liquidity::new(per_bin),
            max_amount_a: Amount::new(FUNDING),
            max_amount_b: Amount::new(FUNDING),
            bins: ids(lower, upper),
        }) else {
            panic!("liquidity added");
        };
        position.id()
    }

    fn swap_params(mint_in: Address, amount_in: u64, min_out: u64, bins: Vec<i32>) -> SwapParams {
        SwapParams {
            trader: BOB,
            pool: PoolId::new(1),
            mint_in,
            amount_in: Amount::new(amount_in),
            min_amount_out: Amount::new(min_out),
            bins,
        }
    }

    fn remove_params(pool: PoolId, position: PositionId, liquidity: u128, bins: Vec<i32>) -> RemoveLiquidityParams {
        RemoveLiquidityParams {
            owner: ALICE,
            pool,
            position,
            liquidity: Liquidity::new(liquidity),
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            bins,
        }
    }

    // -----------------------------------------------------------------------
    // Pools and bins
    // -----------------------------------------------------------------------

    #[test]
    fn pool_is_unique_per_pair() {
        let mut f = fixture();
        let config = PoolConfig::new(MINT_A, MINT_B, BasisPoints::new(50), BasisPoints::new(20), 0);
        assert_eq!(f.book.initialize_pool(config), Err(BookError::PoolAlreadyExists));
        assert!(f.book.pool_for_pair(MINT_A, MINT_B).is_some());
        assert!(f.book.pool_for_pair(MINT_B, MINT_A).is_none());
    }

    #[test]
    fn pool_vaults_are_registered() {
        let f = fixture();
        let Some(pool) = f.book.pool(f.pool) else {
            panic!("pool exists");
        };
        assert_eq!(f.book.transfers().vault_for(f.pool, MINT_A), Some(pool.vault_a()));
        assert_eq!(f.book.transfers().vault_for(f.pool, MINT_B), Some(pool.vault_b()));
    }

    #[test]
    fn bin_initialization_is_idempotent() {
        let mut f = fixture();
        let before = f.book.snapshot();
        let Ok(bin) = f.book.initialize_bin(f.pool, 20) else {
            panic!("bin exists");
        };
        assert_eq!(bin.price(), Price::from_scaled(1_040_769_198_016));
        assert_eq!(f.book.snapshot(), before);
    }

    #[test]
    fn misaligned_or_foreign_bins_rejected() {
        let mut f = fixture();
        assert!(matches!(
            f.book.initialize_bin(f.pool, 10),
            Err(BookError::InvalidBinId(_))
        ));
        assert_eq!(
            f.book.initialize_bin(PoolId::new(9), 0),
            Err(BookError::InvalidPool)
        );
    }

    #[test]
    fn price_query_matches_initialized_bin() {
        let f = fixture();
        assert_eq!(f.book.get_price(f.pool, 0), Ok(Price::ONE));
        assert_eq!(
            f.book.get_price(f.pool, -20),
            Ok(Price::from_scaled(960_827_820_333))
        );
        // Uninitialized bins are priced on demand.
        assert!(f.book.get_price(f.pool, 400).is_ok());
    }

    // -----------------------------------------------------------------------
    // Positions and liquidity
    // -----------------------------------------------------------------------

    #[test]
    fn open_position_mints_token_to_owner() {
        let mut f = fixture();
        let Ok(position) = f.book.open_position(ALICE, f.pool, -20, 20) else {
            panic!("position opens");
        };
        let Some(token) = position.ownership_token() else {
            panic!("token minted");
        };
        assert_eq!(f.book.registry().holder_of(token), Some(ALICE));
        assert!(position.liquidity().is_zero());
        assert_eq!(f.book.positions_of(ALICE).count(), 1);
        assert_eq!(f.book.positions_of(BOB).count(), 0);
        assert_eq!(f.book.range_ids(f.pool, -20, 20), Ok(vec![-20, 0, 20]));
    }

    #[test]
    fn open_position_needs_initialized_bins() {
        let mut f = fixture();
        assert_eq!(
            f.book.open_position(ALICE, f.pool, 80, 140),
            Err(BookError::InvalidBinAccount)
        );
        assert_eq!(
            f.book.open_position(ALICE, f.pool, -20_000, 20_000),
            Err(BookError::RangeTooWide)
        );
        assert!(matches!(
            f.book.open_position(ALICE, f.pool, 20, -20),
            Err(BookError::InvalidBinRange(_))
        ));
    }

    #[test]
    fn deposit_follows_bin_side_of_active() {
        let mut f = fixture();
        let Ok(position) = f.book.open_position(ALICE, f.pool, -20, 20) else {
            panic!("position opens");
        };
        let Ok(receipt) = f.book.add_liquidity(&AddLiquidityParams {
            owner: ALICE,
            pool: f.pool,
            position: position.id(),
            liquidity_per_bin: Liquidity::new(100_000),
            max_amount_a: Amount::new(FUNDING),
            max_amount_b: Amount::new(FUNDING),
            bins: ids(-20, 20),
        }) else {
            panic!("liquidity added");
        };
        // Bin 20 takes A only, bin 0 splits, bin -20 takes B at its price.
        assert_eq!(receipt.amount_a, Amount::new(150_000));
        assert_eq!(receipt.amount_b, Amount::new(50_000 + 96_083));
        assert_eq!(receipt.liquidity, Liquidity::new(300_000));
        assert!(f.book.reserves_balanced(f.pool));
        assert_eq!(
            f.book.transfers().balance(ALICE, MINT_A),
            Amount::new(FUNDING - 150_000)
        );
    }

    #[test]
    fn add_liquidity_checks_bounds_and_bins() {
        let mut f = fixture();
        let Ok(position) = f.book.open_position(ALICE, f.pool, -20, 20) else {
            panic!("position opens");
        };
        let mut params = AddLiquidityParams {
            owner: ALICE,
            pool: f.pool,
            position: position.id(),
            liquidity_per_bin: Liquidity::new(100_000),
            max_amount_a: Amount::new(149_999),
            max_amount_b: Amount::new(FUNDING),
            bins: ids(-20, 20),
        };
        let before = f.book.snapshot();
        assert_eq!(f.book.add_liquidity(&params), Err(BookError::SlippageExceeded));
        assert_eq!(f.book.snapshot(), before);

        params.max_amount_a = Amount::new(FUNDING);
        params.bins = ids(-20, 0);
        assert_eq!(f.book.add_liquidity(&params), Err(BookError::InvalidBinCount));
        params.bins = vec![-20, 20, 0];
        assert_eq!(f.book.add_liquidity(&params), Err(BookError::InvalidBinAccount));
        params.bins = ids(-20, 20);
        params.liquidity_per_bin = Liquidity::ZERO;
        assert_eq!(f.book.add_liquidity(&params), Err(BookError::ZeroLiquidity));
    }

    #[test]
    fn unfunded_deposit_leaves_book_untouched() {
        let mut f = fixture();
        let Ok(position) = f.book.open_position(ALICE, f.pool, 20, 40) else {
            panic!("position opens");
        };
        let before = f.book.snapshot();
        let _ = f.book.drain_events();
        let result = f.book.add_liquidity(&AddLiquidityParams {
            owner: ALICE,
            pool: f.pool,
            position: position.id(),
            liquidity_per_bin: Liquidity::new(u128::from(FUNDING)),
            max_amount_a: Amount::MAX,
            max_amount_b: Amount::MAX,
            bins: ids(20, 40),
        });
        assert_eq!(result, Err(BookError::TransferFailed("insufficient balance")));
        assert_eq!(f.book.snapshot(), before);
        assert!(f.book.drain_events().is_empty());
    }

    #[test]
    fn full_removal_returns_principal() {
        let mut f = fixture();
        let id = provide(&mut f, ALICE, -20, 20, 100_000);
        let Ok(receipt) = f.book.remove_liquidity(&remove_params(f.pool, id, 300_000, ids(-20, 20))) else {
            panic!("removal succeeds");
        };
        assert_eq!(receipt.amount_a, Amount::new(150_000));
        assert_eq!(receipt.amount_b, Amount::new(146_083));
        assert_eq!(f.book.transfers().balance(ALICE, MINT_A), Amount::new(FUNDING));
        assert_eq!(f.book.transfers().balance(ALICE, MINT_B), Amount::new(FUNDING));
        assert!(f.book.reserves_balanced(f.pool));
    }

    #[test]
    fn removal_rounds_to_whole_bins() {
        let mut f = fixture();
        let id = provide(&mut f, ALICE, -20, 20, 100_000);
        let Ok(receipt) = f.book.remove_liquidity(&remove_params(f.pool, id, 100_001, ids(-20, 20))) else {
            panic!("removal succeeds");
        };
        assert_eq!(receipt.liquidity, Liquidity::new(99_999));
        let Some(position) = f.book.position(id) else {
            panic!("position stays open");
        };
        assert_eq!(position.liquidity(), Liquidity::new(200_001));

        assert_eq!(
            f.book.remove_liquidity(&remove_params(f.pool, id, 2, ids(-20, 20))),
            Err(BookError::ZeroLiquidity)
        );
        assert_eq!(
            f.book.remove_liquidity(&remove_params(f.pool, id, 300_000, ids(-20, 20))),
            Err(BookError::InsufficientLiquidity)
        );
    }

    #[test]
    fn removal_honours_minimums() {
        let mut f = fixture();
        let id = provide(&mut f, ALICE, -20, 20, 100_000);
        let mut params = remove_params(f.pool, id, 300_000, ids(-20, 20));
        params.min_amount_a = Amount::new(150_001);
        assert_eq!(f.book.remove_liquidity(&params), Err(BookError::SlippageExceeded));
    }

    #[test]
    fn only_token_holder_is_authorized() {
        let mut f = fixture();
        let id = provide(&mut f, ALICE, -20, 20, 100_000);
        let mut params = remove_params(f.pool, id, 300_000, ids(-20, 20));
        params.owner = BOB;
        assert_eq!(f.book.remove_liquidity(&params), Err(BookError::Unauthorized));

        let Some(token) = f.book.position(id).and_then(Position::ownership_token) else {
            panic!("token minted");
        };
        let Ok(()) = f.book.registry_mut().transfer(token, BOB) else {
            panic!("token exists");
        };
        params.owner = ALICE;
        assert_eq!(f.book.remove_liquidity(&params), Err(BookError::Unauthorized));
        assert_eq!(
            f.book.claim_fees(ALICE, f.pool, id, &ids(-20, 20)),
            Err(BookError::Unauthorized)
        );
        // Still recorded to the previous owner until the holder acts.
        assert_eq!(f.book.position(id).map(Position::owner), Some(ALICE));

        params.owner = BOB;
        let Ok(receipt) = f.book.remove_liquidity(&params) else {
            panic!("holder withdraws");
        };
        assert_eq!(receipt.liquidity, Liquidity::new(300_000));
        assert_eq!(f.book.position(id).map(Position::owner), Some(BOB));
        assert_eq!(f.book.positions_of(BOB).count(), 1);
        assert_eq!(f.book.positions_of(ALICE).count(), 0);
    }

    #[test]
    fn burn_requires_empty_position() {
        let mut f = fixture();
        let id = provide(&mut f, ALICE, -20, 20, 100_000);
        assert_eq!(
            f.book.burn_empty_position(ALICE, f.pool, id),
            Err(BookError::PositionNotEmpty)
        );
        let Ok(_) = f.book.remove_liquidity(&remove_params(f.pool, id, 300_000, ids(-20, 20))) else {
            panic!("removal succeeds");
        };
        let _ = f.book.drain_events();
        assert_eq!(f.book.burn_empty_position(ALICE, f.pool, id), Ok(()));
        assert!(f.book.position(id).is_none());
        assert!(f.book.registry().is_empty());
        assert_eq!(
            f.book.drain_events(),
            vec![BookEvent::PositionBurned {
                pool: f.pool,
                position: id,
                owner: ALICE
            }]
        );
        assert_eq!(
            f.book.burn_empty_position(ALICE, f.pool, id),
            Err(BookError::PositionNotFound)
        );
    }

    // -----------------------------------------------------------------------
    // Swaps and fees
    // -----------------------------------------------------------------------

    #[test]
    fn swap_within_active_bin() {
        let mut f = fixture();
        let _ = provide(&mut f, ALICE, -100, 100, 100_000);
        let Ok(outcome) = f.book.swap(&swap_params(MINT_A, 10_000, 1, vec![0])) else {
            panic!("swap fills");
        };
        assert_eq!(outcome.fee, Amount::new(50));
        assert_eq!(outcome.amount_out, Amount::new(9_950));
        assert_eq!(outcome.end_bin, BinId::ZERO);
        let Some(bin) = f.book.bin(f.pool, 0) else {
            panic!("bin exists");
        };
        assert_eq!(bin.reserve_a(), Amount::new(59_950));
        assert_eq!(bin.reserve_b(), Amount::new(40_050));
        assert_eq!(bin.fee_growth_per_unit_a(), 500_000_000);
        assert!(f.book.reserves_balanced(f.pool));
    }

    #[test]
    fn swap_crosses_bins_upward() {
        let mut f = fixture();
        let _ = provide(&mut f, ALICE, -100, 100, 100_000);
        let Ok(outcome) = f.book.swap(&swap_params(MINT_B, 100_000, 1, vec![0, 20, 40])) else {
            panic!("swap fills");
        };
        assert_eq!(outcome.fee, Amount::new(500));
        assert_eq!(outcome.amount_out, Amount::new(50_000 + 47_560));
        assert_eq!(outcome.bins_traded, 2);
        assert_eq!(outcome.end_bin.get(), 20);
        let Some(pool) = f.book.pool(f.pool) else {
            panic!("pool exists");
        };
        assert_eq!(pool.active_bin_id().get(), 20);
        assert!(f.book.reserves_balanced(f.pool));
    }

    #[test]
    fn exact_exhaustion_steps_past_bin() {
        let mut f = fixture();
        let _ = provide(&mut f, ALICE, -100, 100, 100_000);
        // 50_251 less a 251 fee buys exactly the 50_000 A in bin 0.
        let Ok(outcome) = f.book.swap(&swap_params(MINT_B, 50_251, 1, vec![0])) else {
            panic!("swap fills");
        };
        assert_eq!(outcome.amount_out, Amount::new(50_000));
        assert_eq!(outcome.end_bin.get(), 20);
    }

    #[test]
    fn swap_rejections_leave_book_untouched() {
        let mut f = fixture();
        let _ = provide(&mut f, ALICE, -100, 100, 100_000);
        let before = f.book.snapshot();
        let mut unfunded = swap_params(MINT_A, 10_000, 1, vec![0]);
        unfunded.trader = Address::from_bytes([9u8; 32]);
        let cases = [
            (swap_params(MINT_A, 10_000, 9_951, vec![0]), BookError::SlippageExceeded),
            (swap_params(MINT_A, 0, 0, vec![0]), BookError::ZeroAmount),
            (swap_params(BOB, 10_000, 1, vec![0]), BookError::InvalidMint),
            (swap_params(MINT_A, 10_000, 1, vec![20]), BookError::InvalidBinAccount),
            (swap_params(MINT_A, 10_000, 1, vec![0, 20]), BookError::InvalidBinAccount),
            (swap_params(MINT_A, 10_000, 1, vec![]), BookError::InvalidBinAccount),
            (swap_params(MINT_A, 60_000, 1, vec![0]), BookError::InsufficientLiquidityForSwap),
            (unfunded, BookError::TransferFailed("insufficient balance")),
        ];
        for (params, expected) in cases {
            assert_eq!(f.book.swap(&params), Err(expected), "{params:?}");
            assert_eq!(f.book.snapshot(), before);
        }
    }

    #[test]
    fn quote_matches_swap_without_committing() {
        let mut f = fixture();
        let _ = provide(&mut f, ALICE, -100, 100, 100_000);
        let before = f.book.snapshot();
        let Ok(path) = f.book.swap_path(f.pool, MINT_A, 6) else {
            panic!("pool exists");
        };
        assert_eq!(path, ids(-100, 0).into_iter().rev().collect::<Vec<_>>());
        let Ok(quote) = f.book.quote_swap(f.pool, MINT_A, Amount::new(200_000), &path) else {
            panic!("quote fills");
        };
        assert_eq!(f.book.snapshot(), before);
        let Ok(outcome) = f.book.swap(&swap_params(MINT_A, 200_000, 1, path)) else {
            panic!("swap fills");
        };
        assert_eq!(quote, outcome);
    }

    #[test]
    fn fees_split_between_positions_and_claim_once() {
        let mut f = fixture();
        let wide = provide(&mut f, ALICE, -100, 100, 100_000);
        let narrow = provide(&mut f, ALICE, -40, 40, 100_000);
        let Ok(_) = f.book.swap(&swap_params(MINT_A, 10_000, 1, vec![0])) else {
            panic!("swap fills");
        };

        // Bin 0 holds 200 000 liquidity, so each position earns half of 50.
        for id in [wide, narrow] {
            let Some(position) = f.book.position(id) else {
                panic!("position exists");
            };
            let bins: Vec<i32> = position.range().iter().map(|b| b.get()).collect();
            assert_eq!(
                f.book.claim_fees(ALICE, f.pool, id, &bins),
                Ok(FeePayout {
                    fee_a: Amount::new(25),
                    fee_b: Amount::ZERO
                })
            );
            assert_eq!(
                f.book.claim_fees(ALICE, f.pool, id, &bins),
                Ok(FeePayout::default())
            );
        }
        let Some(pool) = f.book.pool(f.pool) else {
            panic!("pool exists");
        };
        assert!(pool.fee_reserve_a().is_zero());
        assert!(f.book.reserves_balanced(f.pool));
    }

    #[test]
    fn late_position_earns_nothing_from_earlier_swaps() {
        let mut f = fixture();
        let _ = provide(&mut f, ALICE, -100, 100, 100_000);
        let Ok(_) = f.book.swap(&swap_params(MINT_A, 10_000, 1, vec![0])) else {
            panic!("swap fills");
        };
        let late = provide(&mut f, BOB, -20, 20, 100_000);
        assert_eq!(
            f.book.claim_fees(BOB, f.pool, late, &ids(-20, 20)),
            Ok(FeePayout::default())
        );
    }

    // -----------------------------------------------------------------------
    // Rebalancing
    // -----------------------------------------------------------------------

    fn modify_params(pool: PoolId, position: PositionId, old: (i32, i32), new: (i32, i32)) -> ModifyLiquidityParams {
        ModifyLiquidityParams {
            owner: ALICE,
            pool,
            position,
            new_lower_bin_id: new.0,
            new_upper_bin_id: new.1,
            min_surplus_a_out: Amount::ZERO,
            min_surplus_b_out: Amount::ZERO,
            old_bins: ids(old.0, old.1),
            new_bins: ids(new.0, new.1),
        }
    }

    #[test]
    fn rebalance_moves_liquidity_to_new_range() {
        let mut f = fixture();
        let old = provide(&mut f, ALICE, -100, 100, 100_000);
        let _ = f.book.drain_events();
        let Ok(rebalance) = f.book.modify_liquidity(&modify_params(f.pool, old, (-100, 100), (-20, 20))) else {
            panic!("rebalance succeeds");
        };

        assert_eq!(rebalance.liquidity_moved, Liquidity::new(1_100_000));
        assert_eq!(
            rebalance.new_position.liquidity(),
            Liquidity::new(rebalance.liquidity_per_bin.get() * 3)
        );
        assert_eq!(
            rebalance.deposited_a.get() + rebalance.surplus_a.get(),
            rebalance.released_a.get()
        );
        assert_eq!(
            rebalance.deposited_b.get() + rebalance.surplus_b.get(),
            rebalance.released_b.get()
        );
        let Some(emptied) = f.book.position(old) else {
            panic!("old position stays open");
        };
        assert!(emptied.liquidity().is_zero());
        let Some(token) = rebalance.new_position.ownership_token() else {
            panic!("new token minted");
        };
        assert_eq!(f.book.registry().holder_of(token), Some(ALICE));
        assert!(f.book.reserves_balanced(f.pool));

        let rebalanced = f
            .book
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, BookEvent::LiquidityRebalanced { .. }))
            .count();
        assert_eq!(rebalanced, 1);
    }

    #[test]
    fn rebalance_rejections() {
        let mut f = fixture();
        let old = provide(&mut f, ALICE, -100, 100, 100_000);
        let before = f.book.snapshot();

        let mut params = modify_params(f.pool, old, (-100, 100), (-20, 20));
        params.min_surplus_a_out = Amount::MAX;
        assert_eq!(f.book.modify_liquidity(&params), Err(BookError::SlippageExceeded));

        let mut params = modify_params(f.pool, old, (-100, 100), (100, 140));
        params.new_bins = vec![100, 120, 140];
        assert_eq!(f.book.modify_liquidity(&params), Err(BookError::InvalidBinAccount));

        let params = modify_params(f.pool, old, (-100, 80), (-20, 20));
        assert_eq!(f.book.modify_liquidity(&params), Err(BookError::InvalidBinCount));
        assert_eq!(f.book.snapshot(), before);

        let empty = match f.book.open_position(ALICE, f.pool, -20, 20) {
            Ok(position) => position.id(),
            Err(err) => panic!("position opens: {err}"),
        };
        let params = modify_params(f.pool, empty, (-20, 20), (-40, 40));
        assert_eq!(f.book.modify_liquidity(&params), Err(BookError::ZeroLiquidity));
    }
}
