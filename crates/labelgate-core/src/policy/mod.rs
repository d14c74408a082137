//! Policy layer (rules and the evaluation engine).
//!
//! Rules are compiled once at startup into an immutable `RuleSet`; the engine
//! runs every rule against a request and folds the results into a `Verdict`.

pub mod engine;
pub mod lookup;
pub mod rule;
pub mod rules;

pub use engine::{evaluate, evaluate_detailed, Evaluation, RuleSet, Verdict};
pub use lookup::{lookup, Lookup};
pub use rule::{Check, PolicyRule};
pub use rules::{AllowedLabelValues, NoPrivilegedContainers, RequiredLabels};
