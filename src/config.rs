//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TTL_SECS};
use crate::error::{Result, VfsError};
use crate::key::KeyConfig;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory templates are loaded from; ids never resolve outside it
    pub template_root: PathBuf,
    /// Lifetime of a cached template
    pub template_ttl: Duration,
    /// Lifetime of a data record stored without explicit TTL
    pub data_ttl: Duration,
    /// Interval between eviction sweeps of both caches
    pub sweep_interval: Duration,
    /// Capacity of each cache
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Key alphabet, mask and pattern
    pub keys: KeyConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TEMPLATE_ROOT` - Template directory (default: ./templates)
    /// - `TEMPLATE_TTL` - Template cache TTL in seconds (default: 86400)
    /// - `DATA_TTL` - Default data record TTL in seconds (default: 86400)
    /// - `SWEEP_INTERVAL` - Eviction sweep interval in seconds (default: 60)
    /// - `MAX_ENTRIES` - Capacity of each cache (default: 100000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `KEY_ALPHABET`, `KEY_FORMAT`, `KEY_PATTERN` - Key shape (default: 32 alphanumerics)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            template_root: env::var("TEMPLATE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_root),
            template_ttl: env_secs("TEMPLATE_TTL").unwrap_or(defaults.template_ttl),
            data_ttl: env_secs("DATA_TTL").unwrap_or(defaults.data_ttl),
            sweep_interval: env_secs("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            max_entries: env_parse("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            keys: KeyConfig {
                alphabet: env::var("KEY_ALPHABET").unwrap_or(defaults.keys.alphabet),
                format: env::var("KEY_FORMAT").unwrap_or(defaults.keys.format),
                pattern: env::var("KEY_PATTERN").unwrap_or(defaults.keys.pattern),
            },
        }
    }

    /// Rejects values the stores and the sweep task cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(VfsError::Config("sweep interval must be positive".to_string()));
        }
        if self.max_entries == 0 {
            return Err(VfsError::Config("max entries must be positive".to_string()));
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_secs(name: &str) -> Option<Duration> {
    env_parse(name).map(Duration::from_secs)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_root: PathBuf::from("./templates"),
            template_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            data_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            max_entries: DEFAULT_MAX_ENTRIES,
            server_port: 3000,
            keys: KeyConfig::default(),
        }
    }
}
