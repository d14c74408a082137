//! Webhook config loader (strict parsing).

pub mod schema;

use std::fs;

use labelgate_core::error::{AdmissionError, Result};

pub use schema::{GatewaySection, PolicyConfig, WebhookConfig};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "LABELGATE_CONFIG";
/// Used when `CONFIG_PATH_ENV` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "labelgate.yaml";

/// Config path from the environment, or the default.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<WebhookConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AdmissionError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<WebhookConfig> {
    let cfg: WebhookConfig = serde_yaml::from_str(s)
        .map_err(|e| AdmissionError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
