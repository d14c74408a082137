//! `POST /validate` admission handler.
//!
//! Pipeline: body -> `decode` -> `evaluate` (rule-set snapshot) -> `encode`.
//! A policy denial is still HTTP 200 with `allowed: false` in the body; only
//! an undecodable review is rejected at the HTTP level (400).

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use labelgate_core::policy::evaluate_detailed;
use labelgate_core::protocol::{decode, encode_versioned};

use crate::app_state::AppState;

pub async fn validate(State(app): State<AppState>, body: Bytes) -> Response {
    let started = Instant::now();
    let metrics = app.metrics();

    let req = match decode(&body) {
        Ok(req) => req,
        Err(e) => {
            metrics.decode_errors.inc(&[("code", e.code().as_str())]);
            tracing::warn!(error = %e, bytes = body.len(), "rejecting malformed admission review");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let rules = app.rules();
    let eval = evaluate_detailed(&req, &rules);
    let verdict = &eval.verdict;

    for rule in &eval.faulted_rules {
        metrics.internal_faults.inc(&[("rule", rule.as_str())]);
    }

    let encoded = encode_versioned(req.version, Some(&req.uid), verdict);
    if encoded.uid_substituted {
        metrics.missing_uid.inc(&[]);
        tracing::warn!("admission response written with sentinel uid; the control plane will drop it");
    }

    metrics.evaluation_duration.observe(started.elapsed());
    metrics
        .admission_requests
        .inc(&[("verdict", if verdict.allowed() { "allowed" } else { "denied" })]);

    if verdict.allowed() {
        tracing::debug!(
            uid = %req.uid,
            operation = req.operation.as_str(),
            kind = %req.kind.kind,
            generation = rules.generation(),
            "admission allowed"
        );
    } else {
        tracing::info!(
            uid = %req.uid,
            operation = req.operation.as_str(),
            kind = %req.kind.kind,
            namespace = req.namespace.as_deref().unwrap_or(""),
            name = req.name.as_deref().unwrap_or(""),
            generation = rules.generation(),
            violations = verdict.violations().len(),
            reason = verdict.reason().unwrap_or(""),
            "admission denied"
        );
    }

    match encoded.to_vec() {
        Ok(out) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            out,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(uid = %req.uid, error = %e, "failed to serialize admission response");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
