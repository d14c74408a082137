//! Encode-side behavior of the review codec.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::{json, Value};

use labelgate_core::policy::Verdict;
use labelgate_core::protocol::{decode, encode, Operation, MISSING_UID_SENTINEL};

fn to_json(enc: &labelgate_core::protocol::Encoded) -> Value {
    serde_json::from_slice(&enc.to_vec().unwrap()).unwrap()
}

#[test]
fn allowed_response_has_no_status() {
    let enc = encode(Some("abc"), &Verdict::allow());
    assert_eq!(
        to_json(&enc),
        json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "response": { "uid": "abc", "allowed": true }
        })
    );
}

#[test]
fn denied_response_carries_reason() {
    let verdict = Verdict::from_violations(vec![
        "missing required label \"team\"".into(),
        "missing required label \"environment\"".into(),
    ]);
    let out = to_json(&encode(Some("abc"), &verdict));

    assert_eq!(out["response"]["allowed"], json!(false));
    assert_eq!(out["response"]["status"]["code"], json!(403));
    assert_eq!(
        out["response"]["status"]["message"],
        json!("missing required label \"team\"; missing required label \"environment\"")
    );
}

#[test]
fn missing_uid_uses_sentinel_and_is_flagged() {
    let enc = encode(None, &Verdict::allow());
    assert!(enc.uid_substituted);
    assert_eq!(enc.review.response.uid, MISSING_UID_SENTINEL);

    let enc = encode(Some(""), &Verdict::allow());
    assert!(enc.uid_substituted);

    let enc = encode(Some("ok"), &Verdict::allow());
    assert!(!enc.uid_substituted);
}

#[test]
fn encode_is_repeatable() {
    let verdict = Verdict::from_violations(vec!["x".into()]);
    let a = encode(Some("u"), &verdict).to_vec().unwrap();
    let b = encode(Some("u"), &verdict).to_vec().unwrap();
    assert_eq!(a, b);
}

#[test]
fn decode_ignores_object_content_and_unknown_operation() {
    let body = json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "u-1",
            "operation": "PATCH",
            "object": { "metadata": { "labels": "not-a-map" } }
        }
    });
    let req = decode(&serde_json::to_vec(&body).unwrap()).unwrap();
    assert_eq!(req.operation, Operation::Unknown);
    assert_eq!(req.object["metadata"]["labels"], json!("not-a-map"));
}

#[test]
fn decode_defaults_to_v1_without_markers() {
    let body = br#"{"request":{"uid":"u-2","object":{}}}"#;
    let req = decode(body).unwrap();
    assert_eq!(req.version.as_str(), "admission.k8s.io/v1");
    assert!(!req.dry_run);
}

#[test]
fn decode_tolerates_null_and_mistyped_descriptive_fields() {
    let body = json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "u-3",
            "kind": null,
            "resource": { "group": 1 },
            "operation": null,
            "name": 7,
            "namespace": null,
            "dryRun": "yes",
            "object": { "metadata": {} }
        }
    });
    let req = decode(&serde_json::to_vec(&body).unwrap()).unwrap();

    assert_eq!(req.uid, "u-3");
    assert_eq!(req.kind.kind, "");
    assert_eq!(req.resource.resource, "");
    assert_eq!(req.operation, Operation::Unknown);
    assert!(req.name.is_none());
    assert!(req.namespace.is_none());
    assert!(!req.dry_run);
}

#[test]
fn decode_keeps_well_typed_descriptive_fields() {
    let body = json!({
        "request": {
            "uid": "u-4",
            "kind": { "group": "apps", "version": "v1", "kind": "Deployment" },
            "operation": "UPDATE",
            "name": "web",
            "namespace": "shop",
            "dryRun": true,
            "object": {}
        }
    });
    let req = decode(&serde_json::to_vec(&body).unwrap()).unwrap();

    assert_eq!(req.kind.group, "apps");
    assert_eq!(req.operation, Operation::Update);
    assert_eq!(req.name.as_deref(), Some("web"));
    assert_eq!(req.namespace.as_deref(), Some("shop"));
    assert!(req.dry_run);
}
