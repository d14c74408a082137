//! Protocol modules.
//!
//! Hosts the AdmissionReview wire format exchanged with the control plane.
//! Decoding is panic-free: malformed input is reported as `AdmissionError`
//! instead of panicking, and the embedded object is never inspected here.

pub mod review;

pub use review::{
    decode, encode, encode_versioned, AdmissionRequest, AdmissionResponse,
    AdmissionReviewResponse, Encoded, GroupVersionKind, GroupVersionResource, Operation,
    ResponseStatus, ReviewVersion, MISSING_UID_SENTINEL, REVIEW_KIND,
};
