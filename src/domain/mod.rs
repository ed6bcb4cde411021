//! Value types of the liquidity book.
//!
//! Newtypes with validated constructors for everything the ledger stores:
//! amounts, liquidity units, basis points, bin ids and ranges, fixed-point
//! prices, identities and swap outcomes.

mod address;
mod amount;
mod basis_points;
mod bin_id;
mod bin_range;
mod direction;
mod ids;
mod liquidity;
mod mint_pair;
mod price;
mod rounding;
mod swap_outcome;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::{BASIS_POINT_MAX, BasisPoints};
pub use bin_id::BinId;
pub use bin_range::BinRange;
pub use direction::SwapDirection;
pub use ids::{PoolId, PositionId};
pub use liquidity::Liquidity;
pub use mint_pair::MintPair;
pub use price::Price;
pub use rounding::Rounding;
pub use swap_outcome::SwapOutcome;
