//! Book and pool configuration.
//!
//! [`BookConfig`] carries the limits shared by every pool (position width,
//! the whitelist of bin step and fee rate pairs); [`PoolConfig`] carries
//! the parameters of one pool and is validated against it.

mod book_config;
mod pool_config;

pub use book_config::{AllowedParameters, BookConfig, DEFAULT_MAX_BINS_PER_POSITION};
pub use pool_config::PoolConfig;
