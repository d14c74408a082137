//! Rule abstraction.
//!
//! The engine only ever calls `check`; new rule kinds plug in by implementing
//! this trait and being added to a `RuleSet`.

use crate::error::Result;
use crate::protocol::AdmissionRequest;

/// Outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Satisfied,
    /// One human-readable message per violated constraint.
    Violated(Vec<String>),
}

impl Check {
    /// `Satisfied` when `violations` is empty.
    pub fn from_violations(violations: Vec<String>) -> Self {
        if violations.is_empty() {
            Check::Satisfied
        } else {
            Check::Violated(violations)
        }
    }
}

/// A named predicate over an admission request.
///
/// Implementations must be pure and bounded: no I/O, no shared mutable state,
/// no unbounded loops. Return `AdmissionError::InternalFault` for object
/// shapes the rule cannot interpret; the engine turns it into a denial.
pub trait PolicyRule: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, req: &AdmissionRequest) -> Result<Check>;
}
