//! Inventory analysis.
//!
//! Flattening the inventory and deriving report statistics.

pub mod aggregator;

pub use aggregator::*;
