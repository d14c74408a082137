//! Privileged container check.
//!
//! Looks at every container list of a pod spec. Objects without a `spec`, or
//! with no container lists, pass.

use serde_json::Value;

use crate::error::{AdmissionError, Result};
use crate::policy::lookup::{lookup, lookup_array, Lookup};
use crate::policy::rule::{Check, PolicyRule};
use crate::protocol::AdmissionRequest;

const CONTAINER_LISTS: [&str; 3] = ["containers", "initContainers", "ephemeralContainers"];

#[derive(Debug, Clone, Default)]
pub struct NoPrivilegedContainers;

impl NoPrivilegedContainers {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyRule for NoPrivilegedContainers {
    fn name(&self) -> &str {
        "no-privileged-containers"
    }

    fn check(&self, req: &AdmissionRequest) -> Result<Check> {
        let mut violations = Vec::new();

        for list in CONTAINER_LISTS {
            let Some(containers) = lookup_array(&req.object, &["spec", list])? else {
                continue;
            };
            for (idx, c) in containers.iter().enumerate() {
                if is_privileged(c, list, idx)? {
                    let name = c.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
                    violations.push(format!(
                        "privileged container \"{name}\" in spec.{list} is not allowed"
                    ));
                }
            }
        }

        Ok(Check::from_violations(violations))
    }
}

fn is_privileged(container: &Value, list: &str, idx: usize) -> Result<bool> {
    match lookup(container, &["securityContext", "privileged"]) {
        Lookup::Absent => Ok(false),
        Lookup::Present(Value::Bool(b)) => Ok(*b),
        Lookup::Present(_) => Err(AdmissionError::InternalFault(format!(
            "spec.{list}[{idx}].securityContext.privileged is not a boolean"
        ))),
        Lookup::Mismatch { .. } => Err(AdmissionError::InternalFault(format!(
            "spec.{list}[{idx}] has an unreadable securityContext"
        ))),
    }
}
