//! Opaque 32-byte identity for mints, owners, vaults and ownership tokens.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A chain-agnostic 32-byte identity.
///
/// Mints, owners, vaults and ownership tokens are all addresses.  The
/// derived byte-wise ordering is the total order used to put a pool's
/// mints in canonical order.
///
/// # Examples
///
/// ```
/// use liquidity_book::domain::Address;
///
/// let lo = Address::from_bytes([1u8; 32]);
/// let hi = Address::from_bytes([2u8; 32]);
/// assert!(lo < hi);
/// assert_eq!(lo.as_bytes(), [1u8; 32]);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Builds an address whose trailing eight bytes hold `value` (big endian).
    ///
    /// Used by the in-memory services to derive distinct vault and token
    /// identities from a counter.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub const fn from_tagged(tag: u8, value: u64) -> Self {
        let be = value.to_be_bytes();
        let mut bytes = [0u8; 32];
        bytes[0] = tag;
        let mut i = 0;
        while i < be.len() {
            bytes[24 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter().take(4) {
            write!(f, "{byte:02x}")?;
        }
        f.write_str("..")?;
        for byte in self.0.iter().skip(28) {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
