//! In-memory position-ownership tokens.

use std::collections::BTreeMap;

use crate::domain::{Address, PositionId};
use crate::error::BookError;
use crate::traits::OwnershipRegistry;

/// Tag byte of token addresses minted by [`MemoryRegistry`].
const TOKEN_TAG: u8 = 0x70;

/// Ownership tokens held in a map, transferable between holders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRegistry {
    tokens: BTreeMap<Address, (PositionId, Address)>,
    minted: u64,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `token` to a new holder.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::PositionNotFound`] if the token does not exist.
    pub fn transfer(&mut self, token: Address, to: Address) -> Result<(), BookError> {
        let entry = self
            .tokens
            .get_mut(&token)
            .ok_or(BookError::PositionNotFound)?;
        entry.1 = to;
        Ok(())
    }

    /// Position represented by `token`.
    #[must_use]
    pub fn position_of(&self, token: Address) -> Option<PositionId> {
        self.tokens.get(&token).map(|(position, _)| *position)
    }

    /// Number of live tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no token is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl OwnershipRegistry for MemoryRegistry {
    fn mint(&mut self, position: PositionId, owner: Address) -> Address {
        self.minted += 1;
        let token = Address::from_tagged(TOKEN_TAG, self.minted);
        self.tokens.insert(token, (position, owner));
        token
    }

    fn burn(&mut self, token: Address) {
        self.tokens.remove(&token);
    }

    fn holder_of(&self, token: Address) -> Option<Address> {
        self.tokens.get(&token).map(|(_, holder)| *holder)
    }
}
