//! metrix core: concurrent metric storage and incremental summary statistics.
//!
//! This crate owns the in-memory registry (`MetricStore`), the running
//! aggregate engine (`StatisticsEngine`) and the `MetricRegistry` facade that
//! wires them together. It carries no transport or runtime dependencies so the
//! HTTP gateway, tests and embedders can all drive it directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `MetrixError`/`Result`; a poisoned per-metric
//! lock becomes `MetrixError::Internal` rather than a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod stats;
pub mod store;

/// Shared result type.
pub use error::{ClientCode, MetrixError, Result};
pub use config::{NamePolicy, RegistryConfig};
pub use model::{
    AppendMetric, BatchOutcome, BatchRejection, CreateMetric, Metric, MetricId, ObservationInput,
    RawStats,
};
pub use registry::MetricRegistry;
pub use stats::{MedianRule, MetricSummary, StatisticsEngine};
pub use store::{MetricStore, MutationObserver};
