//! Required-label presence.

use crate::error::Result;
use crate::policy::lookup::labels;
use crate::policy::rule::{Check, PolicyRule};
use crate::protocol::AdmissionRequest;

/// Every configured key must be present in `metadata.labels`. Values are not
/// inspected. An object without labels is missing every key.
#[derive(Debug, Clone)]
pub struct RequiredLabels {
    keys: Vec<String>,
}

impl RequiredLabels {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl PolicyRule for RequiredLabels {
    fn name(&self) -> &str {
        "required-labels"
    }

    fn check(&self, req: &AdmissionRequest) -> Result<Check> {
        let present = labels(&req.object)?;

        let missing = self
            .keys
            .iter()
            .filter(|k| present.map_or(true, |m| !m.contains_key(k.as_str())))
            .map(|k| format!("missing required label \"{k}\""))
            .collect();

        Ok(Check::from_violations(missing))
    }
}
