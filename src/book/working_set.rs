//! Staged copy of the state one operation touches.
//!
//! Every public operation copies the pool, the bins it names and the
//! positions it touches into a [`WorkingSet`], mutates only the copy, and
//! records the transfers, token mints/burns and events it wants to happen.
//! The book applies all of it in one commit or drops the working set.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount, BinId, PoolId, PositionId};
use crate::error::BookError;
use crate::events::BookEvent;
use crate::state::{Pool, Position, PriceBin};
use crate::traits::Transfer;

#[derive(Debug, Clone)]
pub(crate) struct WorkingSet {
    pub(super) pool: Pool,
    pub(super) bins: BTreeMap<BinId, PriceBin>,
    pub(super) positions: BTreeMap<PositionId, Position>,
    /// Positions that receive an ownership token on commit.
    pub(super) pending_tokens: Vec<PositionId>,
    /// Positions removed from the book on commit, with the token to burn.
    pub(super) retired: Vec<(PositionId, Option<Address>)>,
    pub(super) transfers: Vec<Transfer>,
    pub(super) events: Vec<BookEvent>,
    pub(super) next_position_id: u64,
}

impl WorkingSet {
    pub(super) const fn new(pool: Pool, next_position_id: u64) -> Self {
        Self {
            pool,
            bins: BTreeMap::new(),
            positions: BTreeMap::new(),
            pending_tokens: Vec::new(),
            retired: Vec::new(),
            transfers: Vec::new(),
            events: Vec::new(),
            next_position_id,
        }
    }

    /// Copies the named bins of this pool into the working set.
    ///
    /// Bins already staged keep their staged state.
    pub(super) fn stage_bins<I>(
        &mut self,
        source: &BTreeMap<(PoolId, BinId), PriceBin>,
        ids: I,
    ) -> Result<(), BookError>
    where
        I: IntoIterator<Item = BinId>,
    {
        let pool = self.pool.id();
        for id in ids {
            if self.bins.contains_key(&id) {
                continue;
            }
            let bin = source
                .get(&(pool, id))
                .ok_or(BookError::InvalidBinAccount)?;
            self.bins.insert(id, bin.clone());
        }
        Ok(())
    }

    pub(super) fn stage_position(&mut self, position: Position) {
        self.positions.insert(position.id(), position);
    }

    pub(super) fn bin(&self, id: BinId) -> Result<&PriceBin, BookError> {
        self.bins.get(&id).ok_or(BookError::InvalidBinAccount)
    }

    pub(super) fn bin_mut(&mut self, id: BinId) -> Result<&mut PriceBin, BookError> {
        self.bins.get_mut(&id).ok_or(BookError::InvalidBinAccount)
    }

    pub(super) fn position(&self, id: PositionId) -> Result<&Position, BookError> {
        self.positions.get(&id).ok_or(BookError::PositionNotFound)
    }

    pub(super) fn position_mut(&mut self, id: PositionId) -> Result<&mut Position, BookError> {
        self.positions.get_mut(&id).ok_or(BookError::PositionNotFound)
    }

    pub(super) fn allocate_position_id(&mut self) -> PositionId {
        let id = PositionId::new(self.next_position_id);
        self.next_position_id += 1;
        id
    }

    /// Stages `holder -> vault` transfers of both assets.
    pub(super) fn collect(&mut self, holder: Address, amount_a: Amount, amount_b: Amount) {
        let (mint_a, mint_b) = (self.pool.mints().mint_a(), self.pool.mints().mint_b());
        let (vault_a, vault_b) = (self.pool.vault_a(), self.pool.vault_b());
        self.push_transfer(mint_a, holder, vault_a, amount_a);
        self.push_transfer(mint_b, holder, vault_b, amount_b);
    }

    /// Stages `vault -> holder` transfers of both assets.
    pub(super) fn pay(&mut self, holder: Address, amount_a: Amount, amount_b: Amount) {
        let (mint_a, mint_b) = (self.pool.mints().mint_a(), self.pool.mints().mint_b());
        let (vault_a, vault_b) = (self.pool.vault_a(), self.pool.vault_b());
        self.push_transfer(mint_a, vault_a, holder, amount_a);
        self.push_transfer(mint_b, vault_b, holder, amount_b);
    }

    pub(super) fn push_transfer(&mut self, mint: Address, from: Address, to: Address, amount: Amount) {
        if amount.is_zero() {
            return;
        }
        self.transfers.push(Transfer {
            mint,
            from,
            to,
            amount,
        });
    }

    pub(super) fn emit(&mut self, event: BookEvent) {
        self.events.push(event);
    }
}
