//! Top-level facade crate for labelgate.
//!
//! Re-exports the core decision path and the webhook library so users can
//! depend on a single crate.

pub mod core {
    pub use labelgate_core::*;
}

pub mod webhook {
    pub use labelgate_webhook::*;
}
