//! Top-level facade crate for metrix.
//!
//! Re-exports the core registry and the HTTP gateway so users can depend on a single crate.

pub mod core {
    pub use metrix_core::*;
}

pub mod gateway {
    pub use metrix_gateway::*;
}
