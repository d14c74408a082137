//! Transport layer (HTTP).
//!
//! Exposes the admission handler. TLS terminates in front of this process;
//! handlers see plaintext request bodies only.

pub mod review;
