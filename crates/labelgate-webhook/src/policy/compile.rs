use std::sync::Arc;

use labelgate_core::error::Result;
use labelgate_core::policy::{
    AllowedLabelValues, NoPrivilegedContainers, PolicyRule, RequiredLabels, RuleSet,
};

use crate::config::PolicyConfig;

/// Compile policy config into a rule set stamped with `generation`.
pub fn compile(policy: &PolicyConfig, generation: u64) -> Result<RuleSet> {
    policy.validate()?;

    let mut rules: Vec<Arc<dyn PolicyRule>> = Vec::with_capacity(3);

    if !policy.required_labels.is_empty() {
        rules.push(Arc::new(RequiredLabels::new(policy.required_labels.iter().cloned())));
    }
    if !policy.allowed_label_values.is_empty() {
        rules.push(Arc::new(AllowedLabelValues::new(policy.allowed_label_values.clone())));
    }
    if policy.deny_privileged {
        rules.push(Arc::new(NoPrivilegedContainers::new()));
    }

    if rules.is_empty() {
        tracing::warn!("policy compiles to an empty rule set; every request will be allowed");
    }

    Ok(RuleSet::new(rules).with_generation(generation))
}
