//! Incremental summary statistics.
//!
//! - `median`: two-heap order-statistics structure and the median rule.
//! - `engine`: per-metric running aggregates fed by store mutations.

pub mod engine;
pub mod median;

pub use engine::{MetricSummary, StatisticsEngine};
pub use median::{MedianHeap, MedianRule};
