//! Request and Response models for the cache HTTP surface
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_key, KeyRequest, SetRequest, MAX_KEY_LENGTH};
pub use responses::{
    ClearResponse, DeleteResponse, ErrorResponse, GetResponse, HealthResponse, KeyResponse,
    SetResponse, StatsResponse,
};
