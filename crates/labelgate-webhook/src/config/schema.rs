use std::collections::{BTreeMap, HashSet};

use labelgate_core::error::{AdmissionError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub policy: PolicyConfig,
}

impl WebhookConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AdmissionError::UnsupportedVersion(format!(
                "config version {} (expected 1)",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.policy.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(1024..=16 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(AdmissionError::InvalidConfig(
                "gateway.max_body_bytes must be between 1024 and 16777216".into(),
            ));
        }
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(AdmissionError::InvalidConfig(format!(
                "gateway.listen must be a socket address: {}",
                self.listen
            )));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8443".into()
}
// Matches the API server's own request size ceiling.
fn default_max_body_bytes() -> usize {
    3 * 1024 * 1024
}

/// Rule configuration. Compiled into a `RuleSet` in this order:
/// required labels, allowed label values, privileged containers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub required_labels: Vec<String>,

    #[serde(default)]
    pub deny_privileged: bool,

    #[serde(default)]
    pub allowed_label_values: BTreeMap<String, Vec<String>>,
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for key in &self.required_labels {
            if key.trim().is_empty() {
                return Err(AdmissionError::InvalidConfig(
                    "policy.required_labels must not contain empty keys".into(),
                ));
            }
            if !seen.insert(key.as_str()) {
                return Err(AdmissionError::InvalidConfig(format!(
                    "policy.required_labels contains duplicate key: {key}"
                )));
            }
        }

        for (key, values) in &self.allowed_label_values {
            if key.trim().is_empty() {
                return Err(AdmissionError::InvalidConfig(
                    "policy.allowed_label_values must not contain empty keys".into(),
                ));
            }
            if values.is_empty() {
                return Err(AdmissionError::InvalidConfig(format!(
                    "policy.allowed_label_values.{key} must not be empty"
                )));
            }
        }

        Ok(())
    }
}
