//! Built-in rule kinds checked one at a time.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeMap;

use serde_json::{json, Value};

use labelgate_core::policy::lookup::{labels, lookup, lookup_array, Lookup};
use labelgate_core::policy::{
    AllowedLabelValues, Check, NoPrivilegedContainers, PolicyRule, RequiredLabels,
};
use labelgate_core::protocol::{decode, AdmissionRequest};

fn request(object: Value) -> AdmissionRequest {
    let body = json!({ "request": { "uid": "u", "object": object } });
    decode(&serde_json::to_vec(&body).unwrap()).unwrap()
}

fn violations(rule: &dyn PolicyRule, object: Value) -> Vec<String> {
    match rule.check(&request(object)).unwrap() {
        Check::Satisfied => Vec::new(),
        Check::Violated(v) => v,
    }
}

#[test]
fn lookup_distinguishes_absent_and_mismatch() {
    let obj = json!({ "metadata": { "name": "x", "labels": null }, "spec": "oops" });

    assert_eq!(lookup(&obj, &["metadata", "name"]), Lookup::Present(&json!("x")));
    assert_eq!(lookup(&obj, &["metadata", "labels"]), Lookup::Absent);
    assert_eq!(lookup(&obj, &["metadata", "annotations"]), Lookup::Absent);
    assert_eq!(lookup(&obj, &["spec", "containers"]), Lookup::Mismatch { at: 1 });
    assert_eq!(lookup(&json!(7), &["metadata"]), Lookup::Mismatch { at: 0 });
    assert_eq!(lookup(&obj, &[]), Lookup::Present(&obj));
}

#[test]
fn labels_helper_treats_missing_as_none() {
    assert!(labels(&json!({})).unwrap().is_none());
    assert!(labels(&json!({ "metadata": null })).unwrap().is_none());
    assert_eq!(labels(&json!({ "metadata": { "labels": {} } })).unwrap().map(|m| m.len()), Some(0));
    assert!(labels(&json!({ "metadata": "x" })).is_err());
}

#[test]
fn lookup_array_rejects_wrong_shape() {
    let err = lookup_array(&json!({ "spec": { "containers": {} } }), &["spec", "containers"])
        .expect_err("mapping is not a list");
    assert_eq!(err.code().as_str(), "INTERNAL_FAULT");
}

#[test]
fn required_labels_ignores_extra_labels() {
    let rule = RequiredLabels::new(["team"]);
    assert!(violations(&rule, json!({ "metadata": { "labels": { "team": "a", "x": "y" } } })).is_empty());
    assert_eq!(rule.keys(), ["team"]);
}

#[test]
fn privileged_container_is_denied_by_name() {
    let rule = NoPrivilegedContainers::new();
    let v = violations(
        &rule,
        json!({ "spec": {
            "containers": [
                { "name": "app" },
                { "name": "agent", "securityContext": { "privileged": true } }
            ],
            "initContainers": [ { "name": "setup", "securityContext": { "privileged": true } } ]
        } }),
    );
    assert_eq!(
        v,
        [
            "privileged container \"agent\" in spec.containers is not allowed",
            "privileged container \"setup\" in spec.initContainers is not allowed",
        ]
    );
}

#[test]
fn privileged_false_and_missing_spec_pass() {
    let rule = NoPrivilegedContainers::new();
    assert!(violations(&rule, json!({ "metadata": {} })).is_empty());
    assert!(violations(
        &rule,
        json!({ "spec": { "containers": [ { "name": "a", "securityContext": { "privileged": false } } ] } })
    )
    .is_empty());
}

#[test]
fn privileged_with_unexpected_shape_faults() {
    let rule = NoPrivilegedContainers::new();
    let err = rule
        .check(&request(json!({ "spec": { "containers": [ { "securityContext": { "privileged": "yes" } } ] } })))
        .expect_err("string is not a boolean");
    assert_eq!(err.code().as_str(), "INTERNAL_FAULT");

    let err = rule
        .check(&request(json!({ "spec": { "containers": "web" } })))
        .expect_err("containers must be a list");
    assert!(err.to_string().contains("spec.containers"));
}

#[test]
fn allowed_label_values_checks_present_keys_only() {
    let mut allowed = BTreeMap::new();
    allowed.insert("environment".to_string(), vec!["dev".to_string(), "prod".to_string()]);
    let rule = AllowedLabelValues::new(allowed);

    assert!(violations(&rule, json!({})).is_empty());
    assert!(violations(&rule, json!({ "metadata": { "labels": { "team": "x" } } })).is_empty());
    assert!(violations(&rule, json!({ "metadata": { "labels": { "environment": "prod" } } })).is_empty());
    assert_eq!(
        violations(&rule, json!({ "metadata": { "labels": { "environment": "qa" } } })),
        ["label \"environment\" has value \"qa\", expected one of [dev, prod]"]
    );
    assert_eq!(
        violations(&rule, json!({ "metadata": { "labels": { "environment": 3 } } })),
        ["label \"environment\" must be a string"]
    );
}
