//! Book-wide limits and the whitelist of pool parameters.

use serde::{Deserialize, Serialize};

use crate::domain::BasisPoints;
use crate::error::BookError;

/// Default cap on the number of bins a single position may span.
pub const DEFAULT_MAX_BINS_PER_POSITION: u32 = 500;

/// One allowed `(bin_step, fee_rate)` combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllowedParameters {
    /// Bin width in basis points.
    pub bin_step: BasisPoints,
    /// Swap fee in basis points.
    pub fee_rate: BasisPoints,
}

impl AllowedParameters {
    /// Creates an entry from raw basis-point values.
    #[must_use]
    pub const fn new(bin_step: u16, fee_rate: u16) -> Self {
        Self {
            bin_step: BasisPoints::new(bin_step),
            fee_rate: BasisPoints::new(fee_rate),
        }
    }
}

const DEFAULT_ALLOWED: [AllowedParameters; 9] = [
    AllowedParameters::new(1, 10),
    AllowedParameters::new(5, 10),
    AllowedParameters::new(20, 10),
    AllowedParameters::new(20, 50),
    AllowedParameters::new(50, 20),
    AllowedParameters::new(50, 100),
    AllowedParameters::new(100, 30),
    AllowedParameters::new(100, 250),
    AllowedParameters::new(200, 500),
];

/// Limits shared by every pool in a [`LiquidityBook`](crate::LiquidityBook).
///
/// # Validation
///
/// - `max_bins_per_position` must be greater than zero.
/// - The whitelist must not be empty.
/// - Every whitelisted bin step must be non-zero.
/// - Every whitelisted fee rate must be below 100%.
///
/// Deserialization validates too, so a host can load the configuration
/// from JSON and get an error instead of an unusable book.
///
/// # Examples
///
/// ```
/// use liquidity_book::config::{AllowedParameters, BookConfig};
/// use liquidity_book::domain::BasisPoints;
///
/// let config = BookConfig::default();
/// assert_eq!(config.max_bins_per_position(), 500);
/// assert!(config.is_allowed(BasisPoints::new(20), BasisPoints::new(50)));
/// assert!(!config.is_allowed(BasisPoints::new(20), BasisPoints::new(30)));
///
/// let custom = BookConfig::new(64, vec![AllowedParameters::new(10, 25)]);
/// assert!(custom.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBookConfig")]
pub struct BookConfig {
    max_bins_per_position: u32,
    allowed_parameters: Vec<AllowedParameters>,
}

impl BookConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::InvalidConfiguration`] if any validation rule
    /// is violated.
    pub fn new(
        max_bins_per_position: u32,
        allowed_parameters: Vec<AllowedParameters>,
    ) -> Result<Self, BookError> {
        let config = Self {
            max_bins_per_position,
            allowed_parameters,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::InvalidConfiguration`] naming the first
    /// violated rule.
    pub fn validate(&self) -> Result<(), BookError> {
        if self.max_bins_per_position == 0 {
            return Err(BookError::InvalidConfiguration(
                "max bins per position must be greater than zero",
            ));
        }
        if self.allowed_parameters.is_empty() {
            return Err(BookError::InvalidConfiguration(
                "at least one bin step and fee rate pair must be allowed",
            ));
        }
        for entry in &self.allowed_parameters {
            if entry.bin_step.is_zero() {
                return Err(BookError::InvalidConfiguration(
                    "allowed bin step must be greater than zero",
                ));
            }
            if entry.fee_rate >= BasisPoints::MAX_PERCENT {
                return Err(BookError::InvalidConfiguration(
                    "allowed fee rate must be below 10000 basis points",
                ));
            }
        }
        Ok(())
    }

    /// Maximum number of bins a position may span.
    #[must_use]
    pub const fn max_bins_per_position(&self) -> u32 {
        self.max_bins_per_position
    }

    /// The whitelist of `(bin_step, fee_rate)` pairs.
    #[must_use]
    pub fn allowed_parameters(&self) -> &[AllowedParameters] {
        &self.allowed_parameters
    }

    /// Returns `true` if the pair is whitelisted.
    #[must_use]
    pub fn is_allowed(&self, bin_step: BasisPoints, fee_rate: BasisPoints) -> bool {
        self.allowed_parameters
            .iter()
            .any(|p| p.bin_step == bin_step && p.fee_rate == fee_rate)
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            max_bins_per_position: DEFAULT_MAX_BINS_PER_POSITION,
            allowed_parameters: DEFAULT_ALLOWED.to_vec(),
        }
    }
}

/// Unvalidated wire form of [`BookConfig`]; missing fields take defaults.
#[derive(Deserialize)]
struct RawBookConfig {
    #[serde(default = "default_max_bins")]
    max_bins_per_position: u32,
    #[serde(default = "default_allowed")]
    allowed_parameters: Vec<AllowedParameters>,
}

fn default_max_bins() -> u32 {
    DEFAULT_MAX_BINS_PER_POSITION
}

fn default_allowed() -> Vec<AllowedParameters> {
    DEFAULT_ALLOWED.to_vec()
}

impl TryFrom<RawBookConfig> for BookConfig {
    type Error = BookError;

    fn try_from(raw: RawBookConfig) -> Result<Self, Self::Error> {
        Self::new(raw.max_bins_per_position, raw.allowed_parameters)
    }
}
