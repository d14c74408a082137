//! labelgate webhook library entry.
//!
//! Wires config, rule-set publication, the admission handler, and ops
//! endpoints into an axum router. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod transport;
