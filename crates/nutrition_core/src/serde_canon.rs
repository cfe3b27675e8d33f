//! Canonical JSON serialization for deterministic hashing
//!
//! Artifacts are written with recursively sorted object keys so that the
//! same fitted model always produces the same bytes and the same Blake3 hash.

use serde::Serialize;
use serde_json::{map::Map, ser::PrettyFormatter, Serializer, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonicalError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Canonicalize a JSON value by sorting all object keys recursively
fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize_value(v)))
                .collect();
            let mut out = Map::with_capacity(sorted.len());
            out.extend(sorted);
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}

/// Serialize a value to compact canonical JSON (sorted keys, no whitespace)
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json_value =
        serde_json::to_value(value).map_err(|e| CanonicalError::SerializationError(e.to_string()))?;
    serde_json::to_string(&canonicalize_value(json_value))
        .map_err(|e| CanonicalError::SerializationError(e.to_string()))
}

/// Serialize a value to indented canonical JSON, used for files on disk
pub fn to_canonical_json_pretty<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json_value =
        serde_json::to_value(value).map_err(|e| CanonicalError::SerializationError(e.to_string()))?;
    let canonical = canonicalize_value(json_value);

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    canonical
        .serialize(&mut serializer)
        .map_err(|e| CanonicalError::SerializationError(e.to_string()))?;

    String::from_utf8(buffer).map_err(|e| CanonicalError::SerializationError(e.to_string()))
}

/// Compute Blake3 hash of the canonical JSON representation as hex
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json = to_canonical_json(value)?;
    Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
}
