//! Evaluation engine.
//!
//! `evaluate` runs every rule in rule-set order (no short-circuit) so a single
//! denial names every violated constraint. A rule that errors or panics is
//! recorded as a violation: the engine fails closed and never raises.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::AdmissionError;
use crate::policy::rule::{Check, PolicyRule};
use crate::protocol::AdmissionRequest;

/// Allow/deny outcome.
///
/// Invariant: `allowed()` iff there are no violations, and `reason()` is
/// `Some` iff denied. Only constructible through `allow` and
/// `from_violations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    violations: Vec<String>,
    reason: Option<String>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            violations: Vec::new(),
            reason: None,
        }
    }

    /// Deny when `violations` is non-empty, allow otherwise.
    pub fn from_violations(violations: Vec<String>) -> Self {
        if violations.is_empty() {
            return Self::allow();
        }
        let reason = violations.join("; ");
        Self {
            violations,
            reason: Some(reason),
        }
    }

    pub fn allowed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Summary of every violation, present only on denial.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }
}

/// Immutable, ordered set of rules.
///
/// Reconfiguration replaces the whole `RuleSet` (new generation); individual
/// rules are never mutated in place.
#[derive(Clone, Default)]
pub struct RuleSet {
    generation: u64,
    rules: Vec<Arc<dyn PolicyRule>>,
}

impl RuleSet {
    pub fn new(rules: Vec<Arc<dyn PolicyRule>>) -> Self {
        Self {
            generation: 0,
            rules,
        }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PolicyRule>> {
        self.rules.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("generation", &self.generation)
            .field("rules", &self.names())
            .finish()
    }
}

/// Verdict plus the names of rules that faulted (for logs/metrics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub faulted_rules: Vec<String>,
}

/// Evaluate `req` against every rule in `rules`.
pub fn evaluate(req: &AdmissionRequest, rules: &RuleSet) -> Verdict {
    evaluate_detailed(req, rules).verdict
}

/// Same as `evaluate`, also reporting which rules faulted.
pub fn evaluate_detailed(req: &AdmissionRequest, rules: &RuleSet) -> Evaluation {
    let mut violations = Vec::new();
    let mut faulted_rules = Vec::new();

    for rule in rules.iter() {
        let name = rule.name();
        let outcome = catch_unwind(AssertUnwindSafe(|| rule.check(req)));

        let fault = match outcome {
            Ok(Ok(Check::Satisfied)) => None,
            Ok(Ok(Check::Violated(msgs))) if msgs.is_empty() => {
                Some("violation reported without a message".to_string())
            }
            Ok(Ok(Check::Violated(msgs))) => {
                violations.extend(msgs);
                None
            }
            Ok(Err(AdmissionError::InternalFault(detail))) => Some(detail),
            Ok(Err(other)) => Some(other.to_string()),
            Err(payload) => Some(format!("rule panicked: {}", panic_message(&*payload))),
        };

        if let Some(detail) = fault {
            tracing::error!(uid = %req.uid, rule = %name, %detail, "rule evaluation fault, denying");
            violations.push(format!("internal evaluation fault in rule {name}: {detail}"));
            faulted_rules.push(name.to_string());
        }
    }

    Evaluation {
        verdict: Verdict::from_violations(violations),
        faulted_rules,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
