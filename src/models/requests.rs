//! Request DTOs for the cache HTTP surface
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Longest key accepted over HTTP, in bytes.
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds (uses the default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for key derivation (POST /key)
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRequest {
    /// Positional arguments
    #[serde(default = "empty_args")]
    pub args: Value,
    /// Named arguments
    #[serde(default = "empty_kwargs")]
    pub kwargs: Value,
}

impl KeyRequest {
    pub fn validate(&self) -> Option<String> {
        if !self.args.is_array() {
            return Some("args must be a JSON array".to_string());
        }
        if !self.kwargs.is_object() {
            return Some("kwargs must be a JSON object".to_string());
        }
        None
    }
}

fn empty_args() -> Value {
    Value::Array(Vec::new())
}

fn empty_kwargs() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Shared key rules for every endpoint taking a key.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} characters",
            MAX_KEY_LENGTH
        ));
    }
    None
}
