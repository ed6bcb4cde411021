//! In-memory implementations of the collaborator traits.
//!
//! [`MemoryLedger`] implements [`AssetTransfer`](crate::traits::AssetTransfer)
//! and [`MemoryRegistry`] implements
//! [`OwnershipRegistry`](crate::traits::OwnershipRegistry), so a
//! [`LiquidityBook`](crate::LiquidityBook) can run end-to-end in tests,
//! simulations and demos.

mod memory_ledger;
mod memory_registry;

pub use memory_ledger::MemoryLedger;
pub use memory_registry::MemoryRegistry;
