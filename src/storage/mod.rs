//! Storage Module
//!
//! The two caches feeding the content producer: parsed templates loaded
//! from a sandboxed directory, and TTL-bound data records kept in memory.
//!
//! The producer depends on the `TemplateSource` and `DataSource` traits so
//! other backends can be injected.

pub mod data;
pub mod templates;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::template::Template;

pub use data::MemoryDataStore;
pub use templates::TemplateStore;

/// Payload of a data record, looked up by field name when rendering.
pub type Payload = Value;

/// Looks up parsed templates by id.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Returns the template for `id`; every failure is `NotFound`.
    async fn template(&self, id: &str) -> Result<Arc<Template>>;
}

/// Looks up data records by key.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Returns the record under `key` while it is unexpired, `NotFound` otherwise.
    async fn get(&self, key: &str) -> Result<DataRecord>;
}

// == Data Record ==
/// A stored payload with its creation time and lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRecord {
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}
