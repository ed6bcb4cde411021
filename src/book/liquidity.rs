//! Liquidity distribution across a position's bin range.
//!
//! A position holds the same liquidity `l` in every bin of its range.  What
//! depositing `l` into a bin costs depends on the bin:
//!
//! | Bin | Asset A | Asset B |
//! |-----|---------|---------|
//! | holds liquidity | `ceil(l × reserve_a / liquidity)` | `ceil(l × reserve_b / liquidity)` |
//! | empty, above the active bin | `l` | `0` |
//! | empty, below the active bin | `0` | `ceil(l × price)` |
//! | empty, active | `l - l/2` | `ceil(l/2 × price)` |
//!
//! Withdrawing `l` releases `floor(l × reserve / liquidity)` of each asset,
//! and the bin's last liquidity releases everything left.  Rounding always
//! favors the bin, so no sequence of deposits and withdrawals can extract
//! more than was put in.

use super::working_set::WorkingSet;
use crate::domain::{Amount, BinId, BinRange, Liquidity, Rounding};
use crate::error::BookError;
use crate::math::{CheckedArithmetic, mul_div};
use crate::state::PriceBin;

/// Iterations that cover the whole `u128` search space.
const SEARCH_ITERATIONS: u32 = 128;

/// Assets needed to deposit `liquidity` into `bin`, or `None` on overflow.
pub(super) fn deposit_amounts(
    bin: &PriceBin,
    liquidity: Liquidity,
    active: BinId,
) -> Option<(Amount, Amount)> {
    let l = liquidity.get();
    let (a, b) = if !bin.liquidity().is_zero() {
        let total = bin.liquidity().get();
        (
            mul_div(l, bin.reserve_a().as_u128(), total, Rounding::Up)?,
            mul_div(l, bin.reserve_b().as_u128(), total, Rounding::Up)?,
        )
    } else if bin.bin_id() > active {
        (l, 0)
    } else if bin.bin_id() < active {
        (0, bin.price().b_for_a(l, Rounding::Up)?)
    } else {
        let half = l / 2;
        (l - half, bin.price().b_for_a(half, Rounding::Up)?)
    };
    Some((Amount::try_from_u128(a)?, Amount::try_from_u128(b)?))
}

/// Assets released by withdrawing `liquidity` from `bin`.
///
/// Returns `None` if the bin holds less liquidity than requested.
pub(super) fn withdraw_amounts(bin: &PriceBin, liquidity: Liquidity) -> Option<(Amount, Amount)> {
    let total = bin.liquidity();
    if liquidity > total {
        return None;
    }
    if liquidity == total {
        return Some((bin.reserve_a(), bin.reserve_b()));
    }
    let a = mul_div(liquidity.get(), bin.reserve_a().as_u128(), total.get(), Rounding::Down)?;
    let b = mul_div(liquidity.get(), bin.reserve_b().as_u128(), total.get(), Rounding::Down)?;
    Some((Amount::try_from_u128(a)?, Amount::try_from_u128(b)?))
}

/// Deposits `per_bin` into every bin of `range` and credits the pool.
///
/// Returns the total assets required.
pub(super) fn deposit(
    ws: &mut WorkingSet,
    range: &BinRange,
    per_bin: Liquidity,
) -> Result<(Amount, Amount), BookError> {
    let active = ws.pool.active_bin_id();
    let mut total = (Amount::ZERO, Amount::ZERO);
    for id in range.iter() {
        let bin = ws.bin_mut(id)?;
        let (a, b) = deposit_amounts(bin, per_bin, active)
            .ok_or(BookError::MathOverflow("deposit amount"))?;
        bin.deposit(per_bin, a, b)?;
        total.0 = total.0.safe_add(&a)?;
        total.1 = total.1.safe_add(&b)?;
    }
    ws.pool.credit(total.0, total.1)?;
    Ok(total)
}

/// Withdraws `per_bin` from every bin of `range` and debits the pool.
///
/// Returns the total assets released.
pub(super) fn withdraw(
    ws: &mut WorkingSet,
    range: &BinRange,
    per_bin: Liquidity,
) -> Result<(Amount, Amount), BookError> {
    let mut total = (Amount::ZERO, Amount::ZERO);
    for id in range.iter() {
        let bin = ws.bin_mut(id)?;
        let (a, b) = withdraw_amounts(bin, per_bin)
            .ok_or(BookError::MathOverflow("withdraw amount"))?;
        bin.withdraw(per_bin, a, b)?;
        total.0 = total.0.safe_add(&a)?;
        total.1 = total.1.safe_add(&b)?;
    }
    ws.pool.debit(total.0, total.1)?;
    Ok(total)
}

/// Assets a deposit of `per_bin` over `range` would require, without
/// mutating anything.  `None` if any quantity would overflow.
fn required(ws: &WorkingSet, range: &BinRange, per_bin: Liquidity) -> Option<(Amount, Amount)> {
    per_bin.checked_mul_count(range.bin_count())?;
    let active = ws.pool.active_bin_id();
    let mut total = (Amount::ZERO, Amount::ZERO);
    for id in range.iter() {
        let bin = ws.bin(id).ok()?;
        bin.liquidity().checked_add(&per_bin)?;
        let (a, b) = deposit_amounts(bin, per_bin, active)?;
        total.0 = total.0.checked_add(&a)?;
        total.1 = total.1.checked_add(&b)?;
    }
    Some(total)
}

/// Largest uniform per-bin liquidity over `range` that `budget` can fund.
///
/// Binary search over the full `u128` range; the cost of a deposit is
/// monotone in the liquidity deposited.
pub(super) fn largest_fundable(
    ws: &WorkingSet,
    range: &BinRange,
    budget: (Amount, Amount),
) -> Liquidity {
    let fits = |candidate: u128| {
        required(ws, range, Liquidity::new(candidate))
            .is_some_and(|(a, b)| a <= budget.0 && b <= budget.1)
    };
    let (mut lo, mut hi) = (0u128, u128::MAX);
    for _ in 0..SEARCH_ITERATIONS {
        if lo == hi {
            break;
        }
        let mid = lo + (hi - lo).div_ceil(2);
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Liquidity::new(lo)
}
