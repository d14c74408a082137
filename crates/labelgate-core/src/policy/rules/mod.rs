//! Built-in rule kinds.

pub mod label_values;
pub mod privileged;
pub mod required_labels;

pub use label_values::AllowedLabelValues;
pub use privileged::NoPrivilegedContainers;
pub use required_labels::RequiredLabels;
