//! Unified error types for the liquidity book.
//!
//! Every fallible operation in the crate returns [`BookError`], so callers
//! see one exhaustive set of named failure conditions.  Errors are grouped
//! by what went wrong:
//!
//! | Group | Variants |
//! |-------|----------|
//! | Validation | `InvalidParameters`, `InvalidMintOrder`, `InvalidBinRange`, `InvalidBinId`, `RangeTooWide`, `InvalidBinStep`, `InvalidBinCount`, `InvalidConfiguration` |
//! | Authorization | `Unauthorized` |
//! | Economic | `ZeroLiquidity`, `ZeroAmount`, `InsufficientLiquidity`, `InsufficientLiquidityForSwap`, `SlippageExceeded`, `PositionNotEmpty` |
//! | Consistency | `InvalidMint`, `InvalidVault`, `InvalidBinAccount`, `InvalidPool`, `PositionNotFound`, `PoolAlreadyExists` |
//! | Arithmetic | `MathOverflow` |
//! | Collaborator | `TransferFailed` |
//!
//! No operation commits partial state when it returns an error.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, BookError>;

/// Every failure the liquidity book can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BookError {
    /// The `(bin_step, fee_rate)` pair is not on the allowed list.
    #[error("bin step and fee rate are not an allowed parameter pair")]
    InvalidParameters,

    /// Asset A must sort strictly before asset B.
    #[error("mints are not in canonical order: asset A must sort before asset B")]
    InvalidMintOrder,

    /// A supplied mint does not belong to the pool.
    #[error("mint does not match the pool's mints")]
    InvalidMint,

    /// The lower bin must be below the upper bin and both aligned to the bin step.
    #[error("invalid bin range: {0}")]
    InvalidBinRange(&'static str),

    /// Requested liquidity is zero.
    #[error("liquidity must be greater than zero")]
    ZeroLiquidity,

    /// A realized amount fell short of the caller's bound.
    #[error("slippage tolerance exceeded")]
    SlippageExceeded,

    /// The caller is not the position owner or does not hold its ownership token.
    #[error("caller is not authorized for this position")]
    Unauthorized,

    /// Not enough liquidity (or released assets) to satisfy the request.
    #[error("insufficient liquidity in position")]
    InsufficientLiquidity,

    /// The position still holds liquidity.
    #[error("position still holds liquidity")]
    PositionNotEmpty,

    /// A swap input of zero.
    #[error("swap input must be greater than zero")]
    ZeroAmount,

    /// A transfer named a vault the pool does not own.
    #[error("vault does not match the pool's vault")]
    InvalidVault,

    /// The bin id is misaligned, out of bounds, or has no representable price.
    #[error("invalid bin id: {0}")]
    InvalidBinId(&'static str),

    /// The range spans more bins than a position may hold.
    #[error("bin range is wider than the allowed maximum")]
    RangeTooWide,

    /// Arithmetic overflow or underflow in a fixed-width value.
    #[error("math overflow: {0}")]
    MathOverflow(&'static str),

    /// The bin step is zero.
    #[error("bin step must be greater than zero")]
    InvalidBinStep,

    /// The swap walk ran out of supplied bins before filling the input.
    #[error("not enough liquidity to complete the swap")]
    InsufficientLiquidityForSwap,

    /// The number of supplied bins does not match the position range.
    #[error("supplied bin count does not match the position range")]
    InvalidBinCount,

    /// A supplied bin is missing or not the expected one.
    #[error("bin account missing or not the expected bin")]
    InvalidBinAccount,

    /// The pool is unknown or the account does not belong to it.
    #[error("position or bin does not belong to the specified pool")]
    InvalidPool,

    /// No position exists with the given id.
    #[error("position not found")]
    PositionNotFound,

    /// A pool for this asset pair already exists.
    #[error("a pool already exists for this asset pair")]
    PoolAlreadyExists,

    /// The asset transfer service rejected the batch.
    #[error("asset transfer failed: {0}")]
    TransferFailed(&'static str),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}
