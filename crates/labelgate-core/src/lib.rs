//! labelgate core: admission review codec, policy rules, and the evaluation engine.
//!
//! This crate holds the pure decision path of the webhook. It carries no
//! transport or runtime dependencies: every operation is a function of its
//! arguments, so the gateway can call it from any number of workers at once.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed envelopes surface as `AdmissionError`, and rule faults are
//! folded into a denying `Verdict` instead of crashing the call.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod policy;
pub mod protocol;

/// Shared result type.
pub use error::{AdmissionError, Result};
