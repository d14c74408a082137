//! Optional nested lookup over untyped objects.
//!
//! Missing keys and explicit `null` are both `Absent`, so "no labels" and
//! "empty labels" collapse into the same case. Walking through a value that is
//! not a mapping yields `Mismatch`, which rules report as an internal fault.

use serde_json::{Map, Value};

use crate::error::{AdmissionError, Result};

/// Outcome of a nested lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Present(&'a Value),
    Absent,
    /// A non-mapping value was reached after `at` path segments (0 = the root).
    Mismatch { at: usize },
}

/// Follow `path` from `root`.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Lookup<'a> {
    let mut cur = root;
    for (depth, key) in path.iter().enumerate() {
        match cur {
            Value::Object(map) => match map.get(*key) {
                Some(Value::Null) | None => return Lookup::Absent,
                Some(next) => cur = next,
            },
            Value::Null => return Lookup::Absent,
            _ => return Lookup::Mismatch { at: depth },
        }
    }
    Lookup::Present(cur)
}

/// Lookup expecting a mapping at `path`.
pub fn lookup_map<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a Map<String, Value>>> {
    match lookup(root, path) {
        Lookup::Absent => Ok(None),
        Lookup::Present(Value::Object(map)) => Ok(Some(map)),
        Lookup::Present(other) => Err(shape_fault(path, path.len(), "a mapping", other)),
        Lookup::Mismatch { at } => Err(mismatch_fault(path, at)),
    }
}

/// Lookup expecting a list at `path`.
pub fn lookup_array<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a Vec<Value>>> {
    match lookup(root, path) {
        Lookup::Absent => Ok(None),
        Lookup::Present(Value::Array(items)) => Ok(Some(items)),
        Lookup::Present(other) => Err(shape_fault(path, path.len(), "a list", other)),
        Lookup::Mismatch { at } => Err(mismatch_fault(path, at)),
    }
}

/// `metadata.labels` of an object; absent labels are `None`.
pub fn labels(object: &Value) -> Result<Option<&Map<String, Value>>> {
    lookup_map(object, &["metadata", "labels"])
}

fn dotted(path: &[&str], len: usize) -> String {
    path.iter().take(len).copied().collect::<Vec<_>>().join(".")
}

fn shape_fault(path: &[&str], len: usize, expected: &str, found: &Value) -> AdmissionError {
    AdmissionError::InternalFault(format!(
        "expected {expected} at {}, found {}",
        dotted(path, len),
        type_name(found)
    ))
}

fn mismatch_fault(path: &[&str], at: usize) -> AdmissionError {
    let at_path = if at == 0 { "<object>".to_string() } else { dotted(path, at) };
    AdmissionError::InternalFault(format!(
        "expected a mapping at {at_path} while resolving {}",
        dotted(path, path.len())
    ))
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
