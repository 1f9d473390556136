//! Cache Entry Module
//!
//! A cached value stamped with its creation time and time-to-live.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A single cache entry with value and TTL metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion time, set by the cache and never by the caller
    pub created_at: DateTime<Utc>,
    /// Lifetime measured from `created_at`
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Utc::now(),
            ttl,
        }
    }

    // == Expires At ==
    /// Returns the instant the entry expires, or None if `created_at + ttl`
    /// is not representable (the entry never expires).
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| self.created_at.checked_add_signed(ttl))
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `created_at + ttl`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks expiry against an explicit clock reading.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
