//! API Module
//!
//! HTTP handlers and routing that expose a cache manager over REST.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `DELETE /clear` - Remove every entry
//! - `POST /key` - Derive a key from call arguments
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
