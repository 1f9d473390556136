//! Cache Module
//!
//! Generic in-memory cache with per-entry TTL and LRU-bounded capacity.
//! Both the template store and the data store are built on it.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default time-to-live of cached templates and data records (24 hours)
pub const DEFAULT_TTL_SECS: u64 = 86_400;

/// Default interval between eviction sweeps
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default capacity of a cache
pub const DEFAULT_MAX_ENTRIES: usize = 100_000;
