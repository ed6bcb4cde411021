//! Bin-to-price conversion.
//!
//! A bin's price is `(1 + bin_step / 10_000)^bin_id`, scaled by
//! [`PRECISION`].  The power is computed by square-and-multiply with
//! 256-bit intermediates, flooring after every multiplication; negative
//! ids take the reciprocal `PRECISION^2 / price(|bin_id|)`.  The result is
//! non-decreasing in `bin_id` for every bin step, and `price(0)` is exactly
//! `PRECISION`.
//!
//! # Examples
//!
//! ```
//! use liquidity_book::domain::{BasisPoints, BinId};
//! use liquidity_book::math::{PRECISION, price_at_bin};
//!
//! let step = BasisPoints::new(20);
//! let Ok(one) = price_at_bin(BinId::ZERO, step) else { panic!("valid") };
//! assert_eq!(one.get(), PRECISION);
//!
//! let (Ok(up), Ok(down)) = (BinId::new(20), BinId::new(-20)) else { panic!("in range") };
//! let (Ok(p_up), Ok(p_down)) = (price_at_bin(up, step), price_at_bin(down, step)) else {
//!     panic!("valid prices");
//! };
//! assert!(p_down < one && one < p_up);
//! ```

use primitive_types::U256;

use super::{PRECISION, narrow};
use crate::domain::{BASIS_POINT_MAX, BasisPoints, BinId, Price};
use crate::error::BookError;

/// Computes the fixed price of `bin_id` for a pool with `bin_step`.
///
/// # Errors
///
/// - [`BookError::InvalidBinStep`] if `bin_step` is zero.
/// - [`BookError::InvalidBinId`] if the price overflows `u128` or
///   rounds down to zero.
pub fn price_at_bin(bin_id: BinId, bin_step: BasisPoints) -> crate::error::Result<Price> {
    if bin_step.is_zero() {
        return Err(BookError::InvalidBinStep);
    }
    let exponent = bin_id.get().unsigned_abs();
    let magnitude = pow_scaled(base_for_step(bin_step), exponent)
        .ok_or(BookError::InvalidBinId("bin price overflows"))?;

    if bin_id.get() >= 0 {
        return Ok(Price::from_scaled(magnitude));
    }
    // PRECISION^2 fits in u128 (10^24 < 2^80); magnitude >= PRECISION.
    let reciprocal = (PRECISION * PRECISION) / magnitude;
    if reciprocal == 0 {
        return Err(BookError::InvalidBinId("bin price underflows to zero"));
    }
    Ok(Price::from_scaled(reciprocal))
}

/// `1 + bin_step / 10_000`, scaled by [`PRECISION`].
const fn base_for_step(bin_step: BasisPoints) -> u128 {
    PRECISION + bin_step.get() as u128 * (PRECISION / BASIS_POINT_MAX as u128)
}

/// Raises a scaled base to an integer power, flooring each product.
///
/// Returns `None` as soon as the running result leaves `u128`.
fn pow_scaled(base: u128, mut exponent: u32) -> Option<u128> {
    let precision = U256::from(PRECISION);
    let mut result = precision;
    let mut factor = U256::from(base);

    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.checked_mul(factor)? / precision;
            narrow(result)?;
        }
        exponent >>= 1;
        if exponent > 0 {
            // Any further use of `factor` multiplies a result >= PRECISION,
            // so a factor beyond u128 already implies overflow.
            narrow(factor)?;
            factor = factor.checked_mul(factor)? / precision;
        }
    }
    narrow(result)
}
