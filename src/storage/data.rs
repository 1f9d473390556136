//! Memory Data Store
//!
//! Keeps data records in memory, each with its own TTL.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DataRecord, DataSource, Payload};
use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{Result, VfsError};
use crate::tasks::Sweep;

// == Memory Data Store ==
/// In-memory data record cache. Internally synchronized.
#[derive(Debug)]
pub struct MemoryDataStore {
    cache: RwLock<CacheStore<Payload>>,
}

impl MemoryDataStore {
    // == Constructor ==
    /// Creates a store applying `default_ttl` to records put without a TTL.
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            cache: RwLock::new(CacheStore::new(max_entries, default_ttl)),
        }
    }

    /// Creates a store from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_ttl, config.max_entries)
    }

    // == Put ==
    /// Stores `payload` under `key`, replacing any previous record.
    ///
    /// The creation time is taken now; `ttl` falls back to the store default.
    /// Fails only when the cache is full and cannot evict.
    pub async fn put(
        &self,
        key: impl Into<String>,
        payload: Payload,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.cache.write().await.set(key.into(), payload, ttl)
    }

    // == Get ==
    /// Returns the record under `key` if present and unexpired.
    pub async fn get(&self, key: &str) -> Result<DataRecord> {
        let entry = self
            .cache
            .write()
            .await
            .get(key)
            .map_err(|_| VfsError::NotFound(format!("data not found: {}", key)))?;

        Ok(DataRecord {
            payload: entry.value,
            created_at: entry.created_at,
            ttl: entry.ttl,
        })
    }

    pub async fn default_ttl(&self) -> Duration {
        self.cache.read().await.default_ttl()
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}

#[async_trait]
impl DataSource for MemoryDataStore {
    async fn get(&self, key: &str) -> Result<DataRecord> {
        MemoryDataStore::get(self, key).await
    }
}

#[async_trait]
impl Sweep for MemoryDataStore {
    fn name(&self) -> &'static str {
        "data"
    }

    async fn sweep_expired(&self) -> usize {
        self.cache.write().await.cleanup_expired()
    }
}
