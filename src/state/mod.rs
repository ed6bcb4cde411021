//! Ledger state records: pools, price bins and positions.
//!
//! Records expose read accessors publicly; mutation is crate-private and
//! only happens inside a staged working set.

mod bin;
mod pool;
mod position;

pub use bin::PriceBin;
pub use pool::Pool;
pub use position::Position;
