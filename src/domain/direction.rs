//! Swap direction over a pool's canonical asset pair.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Which asset the trader pays in.
///
/// Prices quote asset B per unit of asset A, so paying in A pushes the
/// price down (the walk moves toward lower bin ids) and paying in B pushes
/// it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Pay asset A, receive asset B.
    AToB,
    /// Pay asset B, receive asset A.
    BToA,
}

impl SwapDirection {
    /// Sign of the bin walk: `-1` for [`AToB`](Self::AToB), `+1` otherwise.
    #[must_use]
    pub const fn walk_sign(&self) -> i32 {
        match self {
            Self::AToB => -1,
            Self::BToA => 1,
        }
    }

    /// Returns `true` if asset A is the input asset.
    #[must_use]
    pub const fn pays_a(&self) -> bool {
        matches!(self, Self::AToB)
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AToB => f.write_str("a_to_b"),
            Self::BToA => f.write_str("b_to_a"),
        }
    }
}
