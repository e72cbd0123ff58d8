//! Metric API handlers (`/v1/...`).
//!
//! Handlers are thin: they enforce transport limits, call the registry and
//! translate core outcomes into HTTP responses.

pub mod metrics;
pub mod track;
