//! Policy layer (rule-set compilation and publication).
//!
//! Compiles `PolicyConfig` into an immutable `RuleSet` and publishes it
//! through `RuleSetHandle` for request handlers to snapshot.

pub mod compile;
pub mod handle;

pub use compile::compile;
pub use handle::RuleSetHandle;
