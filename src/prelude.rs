//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use liquidity_book::prelude::*;
//! ```

pub use crate::book::{
    AddLiquidityParams, BookSnapshot, FeePayout, LiquidityBook, LiquidityReceipt,
    ModifyLiquidityParams, Rebalance, RemoveLiquidityParams, SwapParams,
};
pub use crate::config::{AllowedParameters, BookConfig, PoolConfig};
pub use crate::domain::{
    Address, Amount, BasisPoints, BinId, BinRange, Liquidity, PoolId, PositionId, Price,
    SwapDirection, SwapOutcome,
};
pub use crate::error::{BookError, Result};
pub use crate::events::BookEvent;
pub use crate::math::CheckedArithmetic;
pub use crate::services::{MemoryLedger, MemoryRegistry};
pub use crate::state::{Pool, Position, PriceBin};
pub use crate::traits::{AssetTransfer, OwnershipRegistry, Transfer};
