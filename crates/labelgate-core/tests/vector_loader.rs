//! JSON test vector loader shared by codec and engine tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    /// Structured review body.
    #[serde(default)]
    pub review: Option<serde_json::Value>,
    /// Raw body, for inputs that are not JSON at all.
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

impl TestVector {
    pub fn body(&self) -> Vec<u8> {
        match (&self.raw, &self.review) {
            (Some(raw), _) => raw.as_bytes().to_vec(),
            (None, Some(review)) => serde_json::to_vec(review).unwrap(),
            (None, None) => panic!("vector {} has neither raw nor review", self.description),
        }
    }
}

pub fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}
