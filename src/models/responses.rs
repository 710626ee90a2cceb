//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheSnapshot, StatsSnapshot};

/// Response body for the cache overview (GET /admin/cache)
#[derive(Debug, Clone, Serialize)]
pub struct CacheOverviewResponse {
    /// Entries across all caches, including expired ones not yet swept
    pub total_entries: usize,
    /// Sorted key list
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate percentage (0-100)
    pub hit_rate: f64,
}

impl CacheOverviewResponse {
    pub fn new(snapshot: CacheSnapshot, stats: StatsSnapshot) -> Self {
        Self {
            total_entries: snapshot.size,
            keys: snapshot.keys,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate,
        }
    }
}

/// Response body for every invalidation / clear action
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub success: bool,
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(message: impl Into<String>, removed: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            removed,
        }
    }
}

/// Response body for the cache-aside demo (GET /cache-test)
#[derive(Debug, Clone, Serialize)]
pub struct CacheTestResponse {
    pub cached: Value,
    pub cache_stats: CacheSnapshot,
}

/// Response body for session resources (GET/PUT /sessions/:session_id/checkout)
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub key: String,
    pub data: Value,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
