//! Checked arithmetic trait for ledger quantities.
//!
//! [`CheckedArithmetic`] turns the `Option`-returning `checked_*` methods of
//! the domain newtypes into `Result`s carrying [`BookError::MathOverflow`],
//! so ledger code can chain them with `?`.
//!
//! # Examples
//!
//! ```
//! use liquidity_book::domain::Amount;
//! use liquidity_book::error::BookError;
//! use liquidity_book::math::CheckedArithmetic;
//!
//! assert_eq!(Amount::new(1).safe_add(&Amount::new(2)), Ok(Amount::new(3)));
//! assert!(matches!(
//!     Amount::ZERO.safe_sub(&Amount::new(1)),
//!     Err(BookError::MathOverflow(_))
//! ));
//! ```

use crate::domain::{Amount, Liquidity};
use crate::error::BookError;

/// Fallible arithmetic for ledger quantities.
///
/// No saturation: every overflow or underflow is an error that aborts the
/// surrounding operation.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::MathOverflow`] on overflow.
    fn safe_add(&self, other: &Self) -> Result<Self, BookError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::MathOverflow`] on underflow.
    fn safe_sub(&self, other: &Self) -> Result<Self, BookError>;
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, BookError> {
        self.checked_add(other)
            .ok_or(BookError::MathOverflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, BookError> {
        self.checked_sub(other)
            .ok_or(BookError::MathOverflow("amount subtraction underflow"))
    }
}

// ---------------------------------------------------------------------------
// Liquidity
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Liquidity {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, BookError> {
        self.checked_add(other)
            .ok_or(BookError::MathOverflow("liquidity addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, BookError> {
        self.checked_sub(other)
            .ok_or(BookError::MathOverflow("liquidity subtraction underflow"))
    }
}

// ---------------------------------------------------------------------------
// Raw accumulators
// ---------------------------------------------------------------------------

impl CheckedArithmetic for u128 {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, BookError> {
        self.checked_add(*other)
            .ok_or(BookError::MathOverflow("accumulator addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, BookError> {
        self.checked_sub(*other)
            .ok_or(BookError::MathOverflow("accumulator subtraction underflow"))
    }
}
