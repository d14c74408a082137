//! Minimal metrics registry for the webhook.
//!
//! Label sets are flattened into sorted key vectors so rendering order does
//! not depend on call-site order. Histogram buckets are fixed integer
//! microseconds; admission latency lives well below a millisecond.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn render_labels(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

// `name` or `name{labels}`; never an empty `{}`.
fn series(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{labels}}}")
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| (render_labels(r.key()), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (labels, val) in rows {
            let _ = writeln!(out, "{} {}", series(name, &labels), val);
        }
    }
}

#[derive(Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    pub fn set(&self, v: i64) {
        self.value.store(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge\n{} {}", name, name, self.get());
    }
}

// 10us, 50us, 100us, 250us, 500us, 1ms, 5ms, 10ms, 100ms
const BUCKETS_MICROS: [u64; 9] = [10, 50, 100, 250, 500, 1_000, 5_000, 10_000, 100_000];

#[derive(Default)]
pub struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

impl Histogram {
    /// Observe a duration; buckets are cumulative.
    pub fn observe(&self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
            let n = self.buckets[i].load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{le=\"{}\"}} {}", name, le, n);
        }
        let count = self.count();
        let _ = writeln!(out, "{}_bucket{{le=\"+Inf\"}} {}", name, count);
        let _ = writeln!(out, "{}_sum {}", name, self.sum.load(Ordering::Relaxed));
        let _ = writeln!(out, "{}_count {}", name, count);
    }
}

#[derive(Default)]
pub struct WebhookMetrics {
    /// label `verdict`: allowed | denied
    pub admission_requests: CounterVec,
    pub decode_errors: CounterVec,
    /// label `rule`
    pub internal_faults: CounterVec,
    pub missing_uid: CounterVec,
    /// label `outcome`: applied | rejected
    pub reloads: CounterVec,
    pub evaluation_duration: Histogram,
    pub rules_loaded: Gauge,
    pub rule_generation: Gauge,
    draining: AtomicBool,
}

impl WebhookMetrics {
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render every metric in Prometheus text format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.admission_requests.render("labelgate_admission_requests_total", &mut out);
        self.decode_errors.render("labelgate_decode_errors_total", &mut out);
        self.internal_faults.render("labelgate_internal_faults_total", &mut out);
        self.missing_uid.render("labelgate_missing_uid_total", &mut out);
        self.reloads.render("labelgate_config_reloads_total", &mut out);
        self.evaluation_duration.render("labelgate_evaluation_duration_micros", &mut out);
        self.rules_loaded.render("labelgate_rules_loaded", &mut out);
        self.rule_generation.render("labelgate_rule_generation", &mut out);
        let _ = writeln!(
            out,
            "# TYPE labelgate_draining gauge\nlabelgate_draining {}",
            u8::from(self.is_draining())
        );
        out
    }
}
