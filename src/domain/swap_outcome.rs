//! Result of routing a swap across bins.

use serde::{Deserialize, Serialize};

use super::{Amount, BinId, SwapDirection};

/// What a swap consumed and produced.
///
/// Returned by both committed swaps and quotes.  `amount_in` includes the
/// fee; `fee` is the part of it credited to liquidity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    /// Direction of the trade.
    pub direction: SwapDirection,
    /// Input paid by the trader, fee included.
    pub amount_in: Amount,
    /// Fee taken from the input.
    pub fee: Amount,
    /// Output received by the trader.
    pub amount_out: Amount,
    /// Active bin before the swap.
    pub start_bin: BinId,
    /// Active bin after the swap.
    pub end_bin: BinId,
    /// Number of bins that traded.
    pub bins_traded: u32,
}

impl SwapOutcome {
    /// Returns `true` if the swap moved the active bin.
    #[must_use]
    pub fn crossed_bins(&self) -> bool {
        self.start_bin != self.end_bin
    }
}
