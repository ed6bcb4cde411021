//! # Liquidity Book
//!
//! Discretized-liquidity market maker: liquidity lives in price bins of a
//! fixed geometric width, positions hold the same liquidity in every bin of
//! a contiguous range, and swaps walk from the active bin across as many
//! bins as the trade needs.
//!
//! All prices and fee accumulators are fixed-point integers scaled by
//! [`PRECISION`](math::PRECISION); every computation is checked and rounds
//! in the pool's favor.  Custody and position ownership are delegated to two
//! collaborator traits, [`AssetTransfer`](traits::AssetTransfer) and
//! [`OwnershipRegistry`](traits::OwnershipRegistry), with in-memory
//! implementations in [`services`].
//!
//! # Quick Start
//!
//! ```rust
//! use liquidity_book::prelude::*;
//!
//! let usdc = Address::from_bytes([1u8; 32]);
//! let weth = Address::from_bytes([2u8; 32]);
//! let alice = Address::from_bytes([7u8; 32]);
//!
//! let mut book = LiquidityBook::in_memory(BookConfig::default());
//! let Ok(pool) = book.initialize_pool(PoolConfig::new(
//!     usdc,
//!     weth,
//!     BasisPoints::new(20),
//!     BasisPoints::new(50),
//!     0,
//! )) else {
//!     panic!("allowed parameters");
//! };
//! for bin in [-20, 0, 20] {
//!     assert!(book.initialize_bin(pool.id(), bin).is_ok());
//! }
//! for mint in [usdc, weth] {
//!     assert!(book.transfers_mut().fund(alice, mint, Amount::new(1_000_000)).is_ok());
//! }
//!
//! // Provide 100 000 units of liquidity in each of three bins.
//! let Ok(position) = book.open_position(alice, pool.id(), -20, 20) else {
//!     panic!("bins initialized");
//! };
//! let added = book.add_liquidity(&AddLiquidityParams {
//!     owner: alice,
//!     pool: pool.id(),
//!     position: position.id(),
//!     liquidity_per_bin: Liquidity::new(100_000),
//!     max_amount_a: Amount::new(1_000_000),
//!     max_amount_b: Amount::new(1_000_000),
//!     bins: vec![-20, 0, 20],
//! });
//! assert!(added.is_ok());
//!
//! // Sell 1 000 USDC into the active bin at price 1.
//! let Ok(outcome) = book.swap(&SwapParams {
//!     trader: alice,
//!     pool: pool.id(),
//!     mint_in: usdc,
//!     amount_in: Amount::new(1_000),
//!     min_amount_out: Amount::new(1),
//!     bins: vec![0],
//! }) else {
//!     panic!("active bin holds enough");
//! };
//! assert_eq!(outcome.fee, Amount::new(5));
//! assert_eq!(outcome.amount_out, Amount::new(995));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer   │  BookConfig + PoolConfig + *Params
//! └──────┬───────┘
//!        │ operation
//!        ▼
//! ┌──────────────┐
//! │ LiquidityBook│  authorizes, stages a working set, commits or drops it
//! └──────┬───────┘
//!        │ liquidity / fees / swap
//!        ▼
//! ┌──────────────┐
//! │    State     │  Pool, PriceBin, Position
//! └──────┬───────┘
//!        │ transfer batch, token mint/burn
//!        ▼
//! ┌──────────────┐
//! │   Services   │  AssetTransfer, OwnershipRegistry
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`book`] | [`LiquidityBook`] facade, operation parameters and receipts |
//! | [`state`] | Persistent records: [`Pool`](state::Pool), [`PriceBin`](state::PriceBin), [`Position`](state::Position) |
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`BinId`](domain::BinId), [`Price`](domain::Price), etc. |
//! | [`config`] | [`BookConfig`](config::BookConfig) and [`PoolConfig`](config::PoolConfig) |
//! | [`traits`] | Collaborator seams for custody and ownership tokens |
//! | [`services`] | In-memory collaborator implementations |
//! | [`events`] | [`BookEvent`](events::BookEvent) log entries |
//! | [`math`] | Checked arithmetic, `mul_div`, bin pricing |
//! | [`error`] | [`BookError`](error::BookError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod book;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod math;
pub mod prelude;
pub mod services;
pub mod state;
pub mod traits;

pub use book::LiquidityBook;
