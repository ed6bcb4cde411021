//! Full-width `a * b / d` for fixed-point arithmetic.
//!
//! Every product of two ledger quantities (liquidity times reserve, amount
//! times price, fee share times [`PRECISION`](crate::math::PRECISION)) can
//! exceed 128 bits before the division brings it back down.  These helpers
//! compute the product in a [`U256`] intermediate, so the only failure mode
//! is a quotient that genuinely does not fit `u128`.
//!
//! # Examples
//!
//! ```
//! use liquidity_book::domain::Rounding;
//! use liquidity_book::math::mul_div;
//!
//! // (2^127 * 4) / 8 overflows u128 in the product but not in the result.
//! let big = 1u128 << 127;
//! assert_eq!(mul_div(big, 4, 8, Rounding::Down), Some(big / 2));
//! assert_eq!(mul_div(10, 1, 3, Rounding::Up), Some(4));
//! assert_eq!(mul_div(1, 1, 0, Rounding::Down), None);
//! ```

use primitive_types::U256;

use crate::domain::Rounding;

/// Computes `a * b / denominator` with explicit rounding.
///
/// Returns `None` if `denominator` is zero or the quotient exceeds `u128`.
#[must_use]
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    // A product of two u128 values always fits 256 bits.
    let product = U256::from(a) * U256::from(b);
    let d = U256::from(denominator);
    let mut quotient = product / d;
    if rounding.is_up() && !(product % d).is_zero() {
        quotient = quotient.checked_add(U256::one())?;
    }
    narrow(quotient)
}

/// Narrows a 256-bit value back to `u128`, or `None` if it does not fit.
#[must_use]
pub fn narrow(value: U256) -> Option<u128> {
    if value.bits() > 128 {
        return None;
    }
    Some(value.low_u128())
}
