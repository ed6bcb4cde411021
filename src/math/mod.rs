//! Fixed-point arithmetic for bin prices, reserves and fee growth.
//!
//! - [`PRECISION`]: the `10^12` scale shared by prices and fee-growth
//!   accumulators.
//! - [`mul_div`]: `a * b / d` through a 256-bit intermediate.
//! - [`price_at_bin`]: the fixed price of a bin.
//! - [`CheckedArithmetic`]: `Result`-returning arithmetic on ledger
//!   quantities.

mod bin_price;
mod checked;
mod mul_div;

pub use bin_price::price_at_bin;
pub use checked::CheckedArithmetic;
pub use mul_div::{mul_div, narrow};

/// Fixed-point scale for prices and fee-growth accumulators.
pub const PRECISION: u128 = 1_000_000_000_000;
