//! In-memory token custody.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Address, Amount, PoolId};
use crate::error::BookError;
use crate::math::CheckedArithmetic;
use crate::traits::{AssetTransfer, Transfer};

/// Tag byte of vault addresses minted by [`MemoryLedger`].
const VAULT_TAG: u8 = 0xFA;

/// A balance sheet of `(holder, mint) -> amount` with pool vaults.
///
/// Batches are applied to an overlay first and folded into the balance
/// sheet only when every transfer of the batch succeeded.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::{Address, Amount, PoolId};
/// use liquidity_book::services::MemoryLedger;
/// use liquidity_book::traits::{AssetTransfer, Transfer};
///
/// let mint = Address::from_bytes([1u8; 32]);
/// let alice = Address::from_bytes([9u8; 32]);
/// let mut ledger = MemoryLedger::new();
/// let vault = ledger.open_vault(PoolId::new(1), mint);
/// assert!(ledger.fund(alice, mint, Amount::new(100)).is_ok());
///
/// let batch = [Transfer { mint, from: alice, to: vault, amount: Amount::new(60) }];
/// assert!(ledger.settle(&batch).is_ok());
/// assert_eq!(ledger.balance(alice, mint), Amount::new(40));
/// assert_eq!(ledger.balance(vault, mint), Amount::new(60));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    balances: BTreeMap<(Address, Address), Amount>,
    vaults: BTreeMap<Address, (PoolId, Address)>,
    vault_index: BTreeMap<(PoolId, Address), Address>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `mint` to `holder` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::MathOverflow`] if the balance would overflow.
    pub fn fund(&mut self, holder: Address, mint: Address, amount: Amount) -> Result<(), BookError> {
        let balance = self.balances.entry((holder, mint)).or_default();
        *balance = balance.safe_add(&amount)?;
        Ok(())
    }

    /// Current balance of `mint` held by `holder`.
    #[must_use]
    pub fn balance(&self, holder: Address, mint: Address) -> Amount {
        self.balances
            .get(&(holder, mint))
            .copied()
            .unwrap_or_default()
    }

    /// Vault opened for `(pool, mint)`, if any.
    #[must_use]
    pub fn vault_for(&self, pool: PoolId, mint: Address) -> Option<Address> {
        self.vault_index.get(&(pool, mint)).copied()
    }

    fn check_vault(&self, transfer: &Transfer) -> Result<(), BookError> {
        let touches_vault = [transfer.from, transfer.to].iter().any(|side| {
            self.vaults
                .get(side)
                .is_some_and(|(_, vault_mint)| *vault_mint == transfer.mint)
        });
        if touches_vault {
            Ok(())
        } else {
            Err(BookError::InvalidVault)
        }
    }
}

impl AssetTransfer for MemoryLedger {
    fn open_vault(&mut self, pool: PoolId, mint: Address) -> Address {
        if let Some(vault) = self.vault_for(pool, mint) {
            return vault;
        }
        let vault = Address::from_tagged(VAULT_TAG, self.vaults.len() as u64);
        self.vaults.insert(vault, (pool, mint));
        self.vault_index.insert((pool, mint), vault);
        vault
    }

    fn settle(&mut self, batch: &[Transfer]) -> Result<(), BookError> {
        let mut overlay: BTreeMap<(Address, Address), Amount> = BTreeMap::new();
        for transfer in batch {
            self.check_vault(transfer)?;
            let from_key = (transfer.from, transfer.mint);
            let to_key = (transfer.to, transfer.mint);

            let from_balance = overlay
                .get(&from_key)
                .copied()
                .unwrap_or_else(|| self.balance(transfer.from, transfer.mint));
            let debited = from_balance
                .checked_sub(&transfer.amount)
                .ok_or(BookError::TransferFailed("insufficient balance"))?;
            overlay.insert(from_key, debited);

            let to_balance = overlay
                .get(&to_key)
                .copied()
                .unwrap_or_else(|| self.balance(transfer.to, transfer.mint));
            let credited = to_balance
                .checked_add(&transfer.amount)
                .ok_or(BookError::TransferFailed("balance overflow"))?;
            overlay.insert(to_key, credited);
        }
        debug!(transfers = batch.len(), "settled transfer batch");
        self.balances.extend(overlay);
        Ok(())
    }
}
