//! The liquidity book: pools, bins and positions under one transactional
//! facade.
//!
//! [`LiquidityBook`] is the only entry point.  The submodules hold the
//! mechanics it composes:
//!
//! - `working_set`: staged copy of the state an operation touches.
//! - `liquidity`: deposit and withdrawal amounts per bin.
//! - `fees`: fee splitting, accumulator growth and settlement.
//! - `swap`: path validation and the cross-bin walk.

mod fees;
mod ledger;
mod liquidity;
mod params;
mod receipts;
mod swap;
mod working_set;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use ledger::{BookSnapshot, LiquidityBook};
pub use params::{AddLiquidityParams, ModifyLiquidityParams, RemoveLiquidityParams, SwapParams};
pub use receipts::{FeePayout, LiquidityReceipt, Rebalance};
