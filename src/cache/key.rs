//! Cache key derivation
//!
//! Keys are the SHA-256 of a canonical JSON rendering of the call arguments.

use serde::Serialize;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Derives a stable key from positional and named arguments.
///
/// Object keys are sorted at every depth before hashing, so two `kwargs`
/// maps holding the same pairs in different order give the same key.
/// Fails only if an argument cannot be represented as JSON (for example a
/// map with non-string keys).
pub fn create_key<A, K>(args: &A, kwargs: &K) -> Result<String>
where
    A: Serialize + ?Sized,
    K: Serialize + ?Sized,
{
    let payload = json!({
        "args": canonicalize(serde_json::to_value(args)?),
        "kwargs": canonicalize(serde_json::to_value(kwargs)?),
    });

    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(&payload)?);
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = pairs
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
