//! Payload serialization
//!
//! Backends store opaque bytes; the manager encodes values on the way in and
//! decodes them on the way out.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Converts typed values to byte payloads and back.
pub trait Serializer: Send + Sync {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// JSON payloads via serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
