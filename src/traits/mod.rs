//! Collaborator seams of the liquidity book.
//!
//! The book drives two external services through these traits:
//! [`AssetTransfer`] for custody and transfer execution, and
//! [`OwnershipRegistry`] for position-ownership tokens.  In-memory
//! implementations live in [`services`](crate::services).

mod asset_transfer;
mod ownership;

pub use asset_transfer::{AssetTransfer, Transfer};
pub use ownership::OwnershipRegistry;
