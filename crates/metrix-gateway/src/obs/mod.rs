//! Lightweight in-process request metrics.
//!
//! Counters and histograms are stored as atomics in `DashMap`s and rendered
//! as Prometheus text by the `/metrics` handler.

pub mod metrics;
