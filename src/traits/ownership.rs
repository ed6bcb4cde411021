//! Position-ownership token seam.
//!
//! Every position is represented by a transferable ownership token.  The
//! book mints one when a position is opened and burns it when the position
//! is retired; authorization requires the caller to be both the recorded
//! owner and the current holder of the token.

use crate::domain::{Address, PositionId};

/// Mints, burns and resolves position-ownership tokens.
///
/// The book only calls [`mint`](Self::mint) and [`burn`](Self::burn) after
/// the operation's transfers have settled, so both are infallible.
pub trait OwnershipRegistry {
    /// Mints the token for `position` to `owner` and returns its identity.
    fn mint(&mut self, position: PositionId, owner: Address) -> Address;

    /// Destroys `token`.  Burning an unknown token is a no-op.
    fn burn(&mut self, token: Address);

    /// Returns the current holder of `token`, if it exists.
    fn holder_of(&self, token: Address) -> Option<Address>;
}
