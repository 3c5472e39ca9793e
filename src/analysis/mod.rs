//! Analysis modules.
//!
//! Aggregation of collection points and the descriptive statistics
//! computed over them.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;
