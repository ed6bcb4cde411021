//! Fee accounting: per-bin fee growth and position settlement.
//!
//! Each bin carries one monotonically increasing accumulator per asset,
//! measured in fee units per unit of liquidity scaled by [`PRECISION`].
//! A swap splits its fee across the bins it traded through, pro rata to
//! the net input each absorbed, and folds each share into the bin's
//! accumulator for the asset paid in.
//!
//! A position's snapshot is the sum of its range's accumulators.  Because
//! the position holds the same liquidity `l` in every bin of its range,
//!
//! ```text
//! owed = Σ_bins (growth_now - growth_then) × l / PRECISION
//!      = (Σ_bins growth_now - snapshot) × l / PRECISION
//! ```
//!
//! so settlement differencing against the summed snapshot is exact.

use tracing::debug;

use super::receipts::FeePayout;
use super::working_set::WorkingSet;
use crate::domain::{Amount, BinRange, PositionId, Rounding, SwapDirection};
use crate::error::BookError;
use crate::events::BookEvent;
use crate::math::{CheckedArithmetic, PRECISION, mul_div};
use crate::state::{Position, PriceBin};

/// Sum of the per-bin accumulators over `range`, for both assets.
pub(super) fn range_fee_growth(
    ws: &WorkingSet,
    range: &BinRange,
) -> Result<(u128, u128), BookError> {
    let mut growth = (0u128, 0u128);
    for id in range.iter() {
        let bin = ws.bin(id)?;
        growth.0 = growth.0.safe_add(&bin.fee_growth_per_unit_a())?;
        growth.1 = growth.1.safe_add(&bin.fee_growth_per_unit_b())?;
    }
    Ok(growth)
}

/// Fees accrued to `position` between its snapshot and `growth`.
pub(super) fn owed(position: &Position, growth: (u128, u128)) -> Result<FeePayout, BookError> {
    let share = position.liquidity_per_bin().get();
    let delta_a = growth.0.safe_sub(&position.fee_growth_snapshot_a())?;
    let delta_b = growth.1.safe_sub(&position.fee_growth_snapshot_b())?;
    Ok(FeePayout {
        fee_a: scale_down(delta_a, share)?,
        fee_b: scale_down(delta_b, share)?,
    })
}

fn scale_down(growth_delta: u128, share: u128) -> Result<Amount, BookError> {
    mul_div(growth_delta, share, PRECISION, Rounding::Down)
        .and_then(Amount::try_from_u128)
        .ok_or(BookError::MathOverflow("owed fee exceeds amount range"))
}

/// Pays `position` the fees it has accrued and re-stamps its snapshot.
///
/// Every bin of the position's range must already be staged.
pub(super) fn settle(ws: &mut WorkingSet, id: PositionId) -> Result<FeePayout, BookError> {
    let position = ws.position(id)?.clone();
    let growth = range_fee_growth(ws, &position.range())?;
    let payout = owed(&position, growth)?;

    ws.pool.pay_fees(payout.fee_a, payout.fee_b)?;
    ws.position_mut(id)?.stamp_snapshot(growth);
    debug!(
        position = %id,
        fee_a = %payout.fee_a,
        fee_b = %payout.fee_b,
        "settled position fees"
    );

    if !payout.is_zero() {
        ws.pay(position.owner(), payout.fee_a, payout.fee_b);
        ws.emit(BookEvent::FeesClaimed {
            pool: position.pool(),
            position: id,
            owner: position.owner(),
            fee_a: payout.fee_a,
            fee_b: payout.fee_b,
        });
    }
    Ok(payout)
}

/// Splits `fee` across swap steps pro rata to the net input each absorbed.
///
/// Shares round down; the remainder goes to the last step.
pub(super) fn split_fee(
    fee: Amount,
    absorbed: &[Amount],
    net_in: Amount,
) -> Result<Vec<Amount>, BookError> {
    let mut shares = Vec::with_capacity(absorbed.len());
    let mut assigned = Amount::ZERO;
    for step in absorbed {
        let share = mul_div(fee.as_u128(), step.as_u128(), net_in.as_u128(), Rounding::Down)
            .and_then(Amount::try_from_u128)
            .ok_or(BookError::MathOverflow("fee share"))?;
        assigned = assigned.safe_add(&share)?;
        shares.push(share);
    }
    let remainder = fee.safe_sub(&assigned)?;
    if let Some(last) = shares.last_mut() {
        *last = last.safe_add(&remainder)?;
    }
    Ok(shares)
}

/// Folds a fee share into the bin's accumulator for the asset paid in.
pub(super) fn accrue(
    bin: &mut PriceBin,
    direction: SwapDirection,
    share: Amount,
) -> Result<(), BookError> {
    if share.is_zero() {
        return Ok(());
    }
    let delta = mul_div(
        share.as_u128(),
        PRECISION,
        bin.liquidity().get(),
        Rounding::Down,
    )
    .ok_or(BookError::MathOverflow("fee growth per unit"))?;
    bin.accrue_fee_growth(direction, delta)
}
