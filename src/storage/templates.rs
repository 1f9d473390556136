//! Template Store
//!
//! Loads templates from files under a sandbox root and caches the parsed
//! result by id. An id is a path relative to the root; `""` and `"/"` map
//! to `default`, and the `.tmpl` suffix is appended when missing, so the
//! id `example/redirect` loads `<root>/example/redirect.tmpl`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::TemplateSource;
use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{Result, VfsError};
use crate::tasks::Sweep;
use crate::template::Template;

/// Suffix of template files.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Id used for an empty or root id.
pub const DEFAULT_TEMPLATE: &str = "default";

// == Template Store ==
/// Filesystem template loader with a TTL cache. Internally synchronized.
#[derive(Debug)]
pub struct TemplateStore {
    /// Canonical sandbox root
    root: PathBuf,
    ttl: Duration,
    cache: RwLock<CacheStore<Arc<Template>>>,
}

impl TemplateStore {
    // == Constructor ==
    /// Creates a store rooted at `root`.
    ///
    /// Fails with `Config` if the root cannot be resolved to an absolute path.
    pub fn new(root: impl AsRef<Path>, ttl: Duration, max_entries: usize) -> Result<Self> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).map_err(|e| {
            VfsError::Config(format!("template root {}: {}", root.display(), e))
        })?;

        Ok(Self {
            root,
            ttl,
            cache: RwLock::new(CacheStore::new(max_entries, ttl)),
        })
    }

    /// Creates a store from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.template_root, config.template_ttl, config.max_entries)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Normalize Id ==
    /// Maps an empty or root id to `default` and appends the template suffix.
    pub fn normalize_id(id: &str) -> String {
        let id = if id.is_empty() || id == "/" {
            DEFAULT_TEMPLATE
        } else {
            id
        };

        if id.ends_with(TEMPLATE_SUFFIX) {
            id.to_string()
        } else {
            format!("{}{}", id, TEMPLATE_SUFFIX)
        }
    }

    // == Template ==
    /// Returns the parsed template for `id`, loading it on a cache miss.
    ///
    /// Ids resolving outside the root, missing files and unparsable sources
    /// all fail with the same `NotFound`.
    pub async fn template(&self, id: &str) -> Result<Arc<Template>> {
        let id = Self::normalize_id(id);

        let cached = self.cache.write().await.get(&id);
        if let Ok(entry) = cached {
            return Ok(entry.value);
        }

        let template = Arc::new(self.load(&id).await.ok_or_else(|| not_found(&id))?);

        if let Err(e) = self
            .cache
            .write()
            .await
            .set(id.clone(), template.clone(), Some(self.ttl))
        {
            warn!("Template {} not cached: {}", id, e);
        }

        Ok(template)
    }

    async fn load(&self, id: &str) -> Option<Template> {
        let path = self.resolve(id).await?;

        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) => {
                debug!("Template {} unreadable: {}", id, e);
                return None;
            }
        };

        match Template::parse(id, &source) {
            Ok(template) => {
                debug!("Template {} loaded", id);
                Some(template)
            }
            Err(e) => {
                debug!("Template {} rejected: {}", id, e);
                None
            }
        }
    }

    /// Resolves `id` under the root, or None when it lands outside it.
    ///
    /// The check runs twice: lexically, then on the canonical path so that
    /// symlinks cannot leave the root either.
    async fn resolve(&self, id: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for part in id.split(|c| c == '/' || c == '\\') {
            match part {
                "" | "." => {}
                ".." => {
                    path.pop();
                }
                part => path.push(part),
            }
        }

        if !path.starts_with(&self.root) {
            return None;
        }

        let canonical = tokio::fs::canonicalize(&path).await.ok()?;
        canonical.starts_with(&self.root).then_some(canonical)
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}

fn not_found(id: &str) -> VfsError {
    VfsError::NotFound(format!("template not found: {}", id))
}

#[async_trait]
impl TemplateSource for TemplateStore {
    async fn template(&self, id: &str) -> Result<Arc<Template>> {
        TemplateStore::template(self, id).await
    }
}

#[async_trait]
impl Sweep for TemplateStore {
    fn name(&self) -> &'static str {
        "templates"
    }

    async fn sweep_expired(&self) -> usize {
        self.cache.write().await.cleanup_expired()
    }
}
