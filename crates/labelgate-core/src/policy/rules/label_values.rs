//! Label-value allow-lists.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Result;
use crate::policy::lookup::labels;
use crate::policy::rule::{Check, PolicyRule};
use crate::protocol::AdmissionRequest;

/// For each configured key that is present, the value must be in its
/// allow-list. Absent keys pass; presence is `RequiredLabels`' job.
#[derive(Debug, Clone)]
pub struct AllowedLabelValues {
    // BTreeMap: violations come out in key order on every call.
    allowed: BTreeMap<String, Vec<String>>,
}

impl AllowedLabelValues {
    pub fn new(allowed: BTreeMap<String, Vec<String>>) -> Self {
        Self { allowed }
    }
}

impl PolicyRule for AllowedLabelValues {
    fn name(&self) -> &str {
        "allowed-label-values"
    }

    fn check(&self, req: &AdmissionRequest) -> Result<Check> {
        let Some(present) = labels(&req.object)? else {
            return Ok(Check::Satisfied);
        };

        let mut violations = Vec::new();
        for (key, values) in &self.allowed {
            match present.get(key) {
                None => {}
                Some(Value::String(v)) if values.iter().any(|a| a == v) => {}
                Some(Value::String(v)) => violations.push(format!(
                    "label \"{key}\" has value \"{v}\", expected one of [{}]",
                    values.join(", ")
                )),
                Some(_) => violations.push(format!("label \"{key}\" must be a string")),
            }
        }

        Ok(Check::from_violations(violations))
    }
}
