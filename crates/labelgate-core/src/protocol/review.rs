//! AdmissionReview envelope (JSON).
//!
//! `decode` validates structure only: a review must carry a request record
//! with a non-empty `uid` and an embedded `object`. What the object contains
//! is the policy engine's business.
//!
//! `encode` cannot fail on a well-formed `Verdict`. When the uid is missing it
//! writes `MISSING_UID_SENTINEL` and flags `Encoded::uid_substituted`, since the
//! control plane drops such a response and the caller only sees a timeout.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AdmissionError, Result};
use crate::policy::Verdict;

/// `kind` marker on both directions of the exchange.
pub const REVIEW_KIND: &str = "AdmissionReview";

/// Written in place of an absent request uid.
pub const MISSING_UID_SENTINEL: &str = "<missing-uid>";

/// HTTP-style code carried in the denial status.
const DENIED_STATUS_CODE: u16 = 403;

/// Supported `apiVersion` markers. The response must echo the request's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewVersion {
    #[default]
    V1,
    V1Beta1,
}

impl ReviewVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewVersion::V1 => "admission.k8s.io/v1",
            ReviewVersion::V1Beta1 => "admission.k8s.io/v1beta1",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admission.k8s.io/v1" => Some(ReviewVersion::V1),
            "admission.k8s.io/v1beta1" => Some(ReviewVersion::V1Beta1),
            _ => None,
        }
    }
}

/// Kind of the object being admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
}

/// Resource being admitted (e.g. `apps/v1 deployments`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupVersionResource {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub resource: String,
}

/// Operation being admitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Connect,
    /// Absent, or a value this build does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Connect => "CONNECT",
            Operation::Unknown => "UNKNOWN",
        }
    }
}

/// Decoded admission request. Built once per call and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionRequest {
    /// Opaque correlation token, echoed verbatim in the response.
    pub uid: String,
    /// Envelope version the response must be written in.
    pub version: ReviewVersion,
    pub kind: GroupVersionKind,
    pub resource: GroupVersionResource,
    pub operation: Operation,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub dry_run: bool,
    /// Candidate resource object (arbitrary nested JSON).
    pub object: Value,
}

// Inbound wire shape. Unknown fields are tolerated: the platform adds
// request fields across releases.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewIn {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    request: Option<RequestIn>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestIn {
    #[serde(default)]
    uid: Option<String>,
    // Descriptive fields: `null` or a wrong type falls back to the default
    // instead of failing the envelope.
    #[serde(default, deserialize_with = "lenient")]
    kind: GroupVersionKind,
    #[serde(default, deserialize_with = "lenient")]
    resource: GroupVersionResource,
    #[serde(default, deserialize_with = "lenient")]
    operation: Operation,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    dry_run: Option<bool>,
    /// `null` and absent both land as `None`.
    #[serde(default)]
    object: Option<Value>,
}

fn lenient<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).unwrap_or_default())
}

/// Decode a raw AdmissionReview body.
pub fn decode(raw: &[u8]) -> Result<AdmissionRequest> {
    let review: ReviewIn = serde_json::from_slice(raw)
        .map_err(|e| AdmissionError::MalformedEnvelope(format!("invalid review json: {e}")))?;

    let version = match review.api_version.as_deref() {
        None => ReviewVersion::default(),
        Some(v) => ReviewVersion::parse(v).ok_or_else(|| {
            AdmissionError::MalformedEnvelope(format!("unsupported apiVersion: {v}"))
        })?,
    };

    if let Some(kind) = review.kind.as_deref() {
        if kind != REVIEW_KIND {
            return Err(AdmissionError::MalformedEnvelope(format!(
                "unexpected kind: {kind} (expected {REVIEW_KIND})"
            )));
        }
    }

    let req = review
        .request
        .ok_or_else(|| AdmissionError::MalformedEnvelope("missing request".into()))?;

    let uid = match req.uid {
        Some(uid) if !uid.is_empty() => uid,
        _ => return Err(AdmissionError::MalformedEnvelope("missing request.uid".into())),
    };

    let object = req
        .object
        .ok_or_else(|| AdmissionError::MalformedEnvelope("missing request.object".into()))?;

    Ok(AdmissionRequest {
        uid,
        version,
        kind: req.kind,
        resource: req.resource,
        operation: req.operation,
        name: req.name,
        namespace: req.namespace,
        dry_run: req.dry_run.unwrap_or(false),
        object,
    })
}

/// Outbound AdmissionReview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewResponse {
    pub api_version: &'static str,
    pub kind: &'static str,
    pub response: AdmissionResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdmissionResponse {
    pub uid: String,
    pub allowed: bool,
    /// Present iff `allowed == false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseStatus {
    pub code: u16,
    pub message: String,
}

/// Result of `encode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub review: AdmissionReviewResponse,
    /// True when the uid was missing and `MISSING_UID_SENTINEL` was written.
    pub uid_substituted: bool,
}

impl Encoded {
    /// Serialize to the response body.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.review)
            .map_err(|e| AdmissionError::Internal(format!("encode review failed: {e}")))
    }
}

/// Encode a verdict as an `admission.k8s.io/v1` review.
pub fn encode(uid: Option<&str>, verdict: &Verdict) -> Encoded {
    encode_versioned(ReviewVersion::V1, uid, verdict)
}

/// Encode a verdict in the given envelope version.
pub fn encode_versioned(version: ReviewVersion, uid: Option<&str>, verdict: &Verdict) -> Encoded {
    let (uid, uid_substituted) = match uid {
        Some(u) if !u.is_empty() => (u.to_string(), false),
        _ => (MISSING_UID_SENTINEL.to_string(), true),
    };

    let status = verdict.reason().map(|reason| ResponseStatus {
        code: DENIED_STATUS_CODE,
        message: reason.to_string(),
    });

    Encoded {
        review: AdmissionReviewResponse {
            api_version: version.as_str(),
            kind: REVIEW_KIND,
            response: AdmissionResponse {
                uid,
                allowed: verdict.allowed(),
                status,
            },
        },
        uid_substituted,
    }
}
