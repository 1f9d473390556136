//! Response DTOs for the HTTP gateway
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for PUT /data
#[derive(Debug, Clone, Serialize)]
pub struct PutDataResponse {
    /// Key the record was stored under
    pub key: String,
    /// Effective TTL in seconds
    pub ttl: u64,
}

impl PutDataResponse {
    pub fn new(key: impl Into<String>, ttl: u64) -> Self {
        Self {
            key: key.into(),
            ttl,
        }
    }
}

/// Counters of one store plus its hit rate
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    #[serde(flatten)]
    pub counters: CacheStats,
    pub hit_rate: f64,
}

impl From<CacheStats> for StoreStats {
    fn from(counters: CacheStats) -> Self {
        Self {
            hit_rate: counters.hit_rate(),
            counters,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub templates: StoreStats,
    pub data: StoreStats,
}

impl StatsResponse {
    pub fn new(templates: CacheStats, data: CacheStats) -> Self {
        Self {
            templates: templates.into(),
            data: data.into(),
        }
    }
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
