//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{create_key, CacheBackend, CacheManager};
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, ClearResponse, DeleteResponse, GetResponse, HealthResponse, KeyRequest,
    KeyResponse, SetRequest, SetResponse, StatsResponse,
};

/// Manager type served over HTTP.
pub type SharedCache = Arc<CacheManager<Box<dyn CacheBackend>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache manager
    pub cache: SharedCache,
}

impl AppState {
    /// Creates a new AppState around a built manager.
    pub fn new(cache: CacheManager<Box<dyn CacheBackend>>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Wraps a single backend with the default TTL.
    pub fn with_backend<B: CacheBackend + 'static>(backend: B) -> Self {
        let backend: Box<dyn CacheBackend> = Box::new(backend);
        Self::new(CacheManager::new(backend))
    }
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(error_msg) => Err(CacheError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value in the cache with optional TTL. Storage is
/// best-effort: a failed write shows up in `/stats` errors, not here.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.cache.default_ttl());
    state.cache.set_with_ttl(&req.key, &req.value, ttl).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    check_key(&key)?;

    match state.cache.get::<Value>(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    check_key(&key)?;

    if !state.cache.exists(&key).await {
        return Err(CacheError::NotFound(key));
    }
    state.cache.delete(&key).await;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::new())
}

/// Handler for POST /key
///
/// Derives the cache key for a set of call arguments.
pub async fn key_handler(Json(req): Json<KeyRequest>) -> Result<Json<KeyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = create_key(&req.args, &req.kwargs)?;
    Ok(Json(KeyResponse { key }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.backend().name()))
}
