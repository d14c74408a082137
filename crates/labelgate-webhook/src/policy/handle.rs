use std::sync::{Arc, RwLock};

use labelgate_core::policy::RuleSet;

/// Current rule set, replaced only as a whole.
///
/// Handlers take an `Arc` snapshot and evaluate against it, so an in-flight
/// request keeps one generation even if `replace` runs concurrently.
#[derive(Debug)]
pub struct RuleSetHandle {
    current: RwLock<Arc<RuleSet>>,
}

impl RuleSetHandle {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(rules)),
        }
    }

    /// Snapshot of the current rule set.
    pub fn current(&self) -> Arc<RuleSet> {
        // The guarded value is a single Arc, always whole; a poisoned lock
        // still holds a consistent generation.
        let g = self.current.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&*g)
    }

    /// Publish a new rule set, returning the one it replaced.
    pub fn replace(&self, rules: RuleSet) -> Arc<RuleSet> {
        let mut g = self.current.write().unwrap_or_else(|p| p.into_inner());
        std::mem::replace(&mut *g, Arc::new(rules))
    }

    /// Stamp `rules` with the next generation and publish it. Numbering and
    /// replacement happen under one write lock, so generations go live in
    /// increasing order.
    pub fn publish_next(&self, rules: RuleSet) -> Arc<RuleSet> {
        let mut g = self.current.write().unwrap_or_else(|p| p.into_inner());
        let next = Arc::new(rules.with_generation(g.generation() + 1));
        *g = Arc::clone(&next);
        next
    }

    pub fn generation(&self) -> u64 {
        self.current().generation()
    }
}
