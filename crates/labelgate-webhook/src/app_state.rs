//! Shared application state for the labelgate webhook.
//!
//! Holds the loaded config, the published rule set, and metrics. Startup and
//! reload errors are returned as `Result`; nothing here panics.

use std::sync::Arc;

use labelgate_core::error::Result;
use labelgate_core::policy::RuleSet;

use crate::config::{self, WebhookConfig};
use crate::obs::WebhookMetrics;
use crate::policy::{self, RuleSetHandle};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: WebhookConfig,
    rules: RuleSetHandle,
    metrics: WebhookMetrics,
}

impl AppState {
    /// Build application state, compiling the initial rule set (generation 1).
    pub fn new(cfg: WebhookConfig) -> Result<Self> {
        let rules = policy::compile(&cfg.policy, 1)?;
        let metrics = WebhookMetrics::default();
        record_rules(&metrics, &rules);

        tracing::info!(
            generation = rules.generation(),
            rules = ?rules.names(),
            "rule set compiled"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                rules: RuleSetHandle::new(rules),
                metrics,
            }),
        })
    }

    /// Config the process started with. Reloads only replace the rule set;
    /// listener settings need a restart.
    pub fn cfg(&self) -> &WebhookConfig {
        &self.inner.cfg
    }

    /// Snapshot of the rule set for one request.
    pub fn rules(&self) -> Arc<RuleSet> {
        self.inner.rules.current()
    }

    pub fn metrics(&self) -> &WebhookMetrics {
        &self.inner.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    /// Compile `policy` and publish it as the next generation. On error the
    /// current rule set stays in place.
    /// A rejected policy does not consume a generation number.
    pub fn apply_policy(&self, policy_cfg: &config::PolicyConfig) -> Result<u64> {
        match policy::compile(policy_cfg, 0) {
            Ok(rules) => {
                let live = self.inner.rules.publish_next(rules);
                record_rules(&self.inner.metrics, &live);
                let generation = live.generation();
                tracing::info!(generation, rules = ?live.names(), "rule set replaced");
                self.inner.metrics.reloads.inc(&[("outcome", "applied")]);
                Ok(generation)
            }
            Err(e) => {
                self.inner.metrics.reloads.inc(&[("outcome", "rejected")]);
                Err(e)
            }
        }
    }

    /// Re-read the config file and publish its policy section.
    pub fn reload_from_file(&self, path: &str) -> Result<u64> {
        match config::load_from_file(path) {
            Ok(cfg) => self.apply_policy(&cfg.policy),
            Err(e) => {
                self.inner.metrics.reloads.inc(&[("outcome", "rejected")]);
                Err(e)
            }
        }
    }
}

fn record_rules(metrics: &WebhookMetrics, rules: &RuleSet) {
    metrics.rules_loaded.set(i64::try_from(rules.len()).unwrap_or(i64::MAX));
    metrics.rule_generation.set(i64::try_from(rules.generation()).unwrap_or(i64::MAX));
}
