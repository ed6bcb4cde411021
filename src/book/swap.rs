//! Cross-bin swap routing.
//!
//! # Algorithm
//!
//! 1. Take the fee off the input: `fee = floor(amount_in × fee_rate / 10_000)`.
//! 2. Starting at the active bin, walk the caller's path one bin step at a
//!    time: toward lower ids when paying asset A, toward higher ids when
//!    paying asset B.
//! 3. Each bin trades at its fixed price.  If the remaining input can buy
//!    the bin's whole outgoing reserve, the bin is exhausted and the rest
//!    carries on; otherwise the bin absorbs the remainder and the walk
//!    stops.  Bins with no liquidity or nothing to sell are passed through.
//! 4. Split the fee across the bins that traded and fold each share into
//!    the bin's fee growth.
//! 5. The active bin becomes the last bin that traded, or the next one if
//!    the final step exhausted it exactly.
//!
//! Input needed to empty a bin rounds up and partial output rounds down,
//! so every step favors the bin.

use tracing::debug;

use super::fees;
use super::working_set::WorkingSet;
use crate::domain::{Amount, BinId, Price, Rounding, SwapDirection, SwapOutcome};
use crate::error::BookError;
use crate::math::CheckedArithmetic;

/// Checks that `path` starts at `active` and advances one bin step at a
/// time in the direction of the trade.
pub(super) fn validate_path(
    ws: &WorkingSet,
    direction: SwapDirection,
    path: &[BinId],
) -> Result<(), BookError> {
    let step = ws.pool.bin_step();
    let mut expected = Some(ws.pool.active_bin_id());
    if path.is_empty() {
        return Err(BookError::InvalidBinAccount);
    }
    for id in path {
        if expected != Some(*id) {
            return Err(BookError::InvalidBinAccount);
        }
        expected = id.stepped(direction.walk_sign(), step);
    }
    Ok(())
}

/// Input that buys all of `reserve_out` at `price`, rounded up.
///
/// Kept wide: far from bin zero the cost of a whole bin routinely exceeds
/// any [`Amount`]. `None` means it does not fit a `u128` either.
fn input_for_all(price: Price, direction: SwapDirection, reserve_out: Amount) -> Option<u128> {
    match direction {
        SwapDirection::AToB => price.a_for_b(reserve_out.as_u128(), Rounding::Up),
        SwapDirection::BToA => price.b_for_a(reserve_out.as_u128(), Rounding::Up),
    }
}

/// Output bought by `amount_in` at `price`, rounded down and capped at
/// `reserve_out`.
fn output_for(
    price: Price,
    direction: SwapDirection,
    amount_in: Amount,
    reserve_out: Amount,
) -> Option<Amount> {
    let output = match direction {
        SwapDirection::AToB => price.b_for_a(amount_in.as_u128(), Rounding::Down)?,
        SwapDirection::BToA => price.a_for_b(amount_in.as_u128(), Rounding::Down)?,
    };
    Amount::try_from_u128(output.min(reserve_out.as_u128()))
}

/// Routes `amount_in` along `path`, mutating the staged bins and pool.
///
/// The path must already be staged and validated.
pub(super) fn route(
    ws: &mut WorkingSet,
    direction: SwapDirection,
    amount_in: Amount,
    path: &[BinId],
) -> Result<SwapOutcome, BookError> {
    if amount_in.is_zero() {
        return Err(BookError::ZeroAmount);
    }
    let fee = ws.pool.fee_rate().apply(amount_in, Rounding::Down)?;
    let net_in = amount_in.safe_sub(&fee)?;
    if net_in.is_zero() {
        return Err(BookError::ZeroAmount);
    }

    let step = ws.pool.bin_step();
    let start_bin = ws.pool.active_bin_id();
    let mut end_bin = start_bin;
    let mut remaining = net_in;
    let mut amount_out = Amount::ZERO;
    let mut traded: Vec<(BinId, Amount)> = Vec::new();

    for &id in path {
        if remaining.is_zero() {
            break;
        }
        let bin = ws.bin_mut(id)?;
        let reserve_out = bin.reserve_out(direction);
        if bin.liquidity().is_zero() || reserve_out.is_zero() {
            debug!(bin = id.get(), "passing through bin without liquidity");
            continue;
        }

        let price = bin.price();
        // Narrowed only once it is known to be at most `remaining`.
        let exhausting = input_for_all(price, direction, reserve_out)
            .filter(|&capacity| capacity <= remaining.as_u128())
            .and_then(Amount::try_from_u128);
        let (absorbed, out) = match exhausting {
            Some(capacity) => (capacity, reserve_out),
            None => {
                let out = output_for(price, direction, remaining, reserve_out)
                    .ok_or(BookError::MathOverflow("swap step output"))?;
                (remaining, out)
            }
        };
        bin.trade(direction, absorbed, out)?;
        let exhausted = bin.reserve_out(direction).is_zero();

        remaining = remaining.safe_sub(&absorbed)?;
        amount_out = amount_out.safe_add(&out)?;
        traded.push((id, absorbed));
        debug!(
            bin = id.get(),
            absorbed = %absorbed,
            out = %out,
            exhausted,
            "swap step"
        );

        end_bin = if remaining.is_zero() && exhausted {
            id.stepped(direction.walk_sign(), step).unwrap_or(id)
        } else {
            id
        };
    }

    if !remaining.is_zero() {
        return Err(BookError::InsufficientLiquidityForSwap);
    }

    let absorbed: Vec<Amount> = traded.iter().map(|(_, a)| *a).collect();
    let shares = fees::split_fee(fee, &absorbed, net_in)?;
    for ((id, _), share) in traded.iter().zip(shares) {
        fees::accrue(ws.bin_mut(*id)?, direction, share)?;
    }

    ws.pool.record_swap(direction, amount_in, fee, amount_out)?;
    ws.pool.set_active_bin(end_bin);

    Ok(SwapOutcome {
        direction,
        amount_in,
        fee,
        amount_out,
        start_bin,
        end_bin,
        bins_traded: u32::try_from(traded.len())
            .map_err(|_| BookError::MathOverflow("bins traded"))?,
    })
}
