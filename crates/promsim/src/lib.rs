//! Top-level facade crate for promsim.
//!
//! Re-exports the core model and the exporter library so users can depend on a
//! single crate.

pub mod core {
    pub use promsim_core::*;
}

pub mod exporter {
    pub use promsim_exporter::*;
}
