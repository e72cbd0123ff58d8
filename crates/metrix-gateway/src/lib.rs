//! metrix gateway library entry.
//!
//! This crate wires the HTTP transport, config loading, request accounting and
//! operational endpoints around a `metrix_core::MetricRegistry`. It is
//! intended to be consumed by the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;
