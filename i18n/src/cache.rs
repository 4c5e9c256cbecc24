//! Resolution cache for resource bundles.
//!
//! Each distinct [`BundleKey`] is resolved at most once while its entry is
//! resident, and a miss is cached the same way as a hit. The cache is bounded
//! by capacity and optionally by age. Loader failures are returned to the
//! caller and are not cached.
use crate::config::CacheConfig;
use crate::errors::{I18nError, LoadError};
use crate::key::BundleKey;
use crate::locale::Locale;
use crate::metrics_defs::{CACHE_HIT, CACHE_MISS, CACHE_NEGATIVE_HIT, RESOLVE_DURATION};
use crate::resolver::{BundleLoader, PluginHandle, PluginResolver, TranslationTable};
use moka::sync::Cache;
use shared::{counter, histogram};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

#[derive(Debug, PartialEq)]
pub enum Resolution {
    Found(TranslationTable),
    NotFound,
}

#[derive(Debug)]
pub struct CacheEntry {
    resolution: Resolution,
    timestamp: u64,
}

impl CacheEntry {
    fn new(resolution: Resolution) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        CacheEntry {
            resolution,
            timestamp,
        }
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Creation time in milliseconds since the epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

pub struct ResolutionCache {
    entries: Cache<BundleKey, Arc<CacheEntry>>,
    // Resolved plugins, kept apart from the identity key.
    plugins: Cache<(String, String), PluginHandle>,
    resolver: Arc<dyn PluginResolver>,
    loader: Arc<dyn BundleLoader>,
}

impl ResolutionCache {
    pub fn new(
        config: &CacheConfig,
        resolver: Arc<dyn PluginResolver>,
        loader: Arc<dyn BundleLoader>,
    ) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(ttl_secs) = config.ttl_secs {
            builder = builder.time_to_live(Duration::from_secs(ttl_secs));
        }
        let entries = builder.build();

        let plugins = Cache::builder().max_capacity(config.max_capacity).build();

        ResolutionCache {
            entries,
            plugins,
            resolver,
            loader,
        }
    }

    pub fn get(&self, key: &BundleKey) -> Option<Arc<CacheEntry>> {
        self.entries.get(key)
    }

    /// Returns the cached entry for `key`, resolving it with `locale` first
    /// if there is none. Concurrent callers for the same key wait for a
    /// single resolution and all receive its entry.
    pub fn resolve(&self, key: &BundleKey, locale: &Locale) -> Result<Arc<CacheEntry>, I18nError> {
        let mut resolved_here = false;
        let entry = self.entries.try_get_with_by_ref(key, || {
            resolved_here = true;
            let started = Instant::now();
            let entry = self.load(key, locale);
            histogram!(RESOLVE_DURATION).record(started.elapsed().as_secs_f64());
            entry.map(Arc::new)
        })?;

        if resolved_here {
            counter!(CACHE_MISS).increment(1);
            let found = matches!(entry.resolution, Resolution::Found(_));
            tracing::debug!(%key, %locale, found, "resolved bundle");
        } else if entry.resolution == Resolution::NotFound {
            counter!(CACHE_NEGATIVE_HIT).increment(1);
            tracing::debug!(%key, "bundle known to be missing");
        } else {
            counter!(CACHE_HIT).increment(1);
            tracing::debug!(%key, "bundle cache hit");
        }

        Ok(entry)
    }

    fn load(&self, key: &BundleKey, locale: &Locale) -> Result<CacheEntry, LoadError> {
        let Some(plugin) = self.plugin(key) else {
            return Ok(CacheEntry::new(Resolution::NotFound));
        };

        let resolution = match self.loader.load(&plugin, key.bundle_name(), locale)? {
            Some(table) => Resolution::Found(table),
            None => Resolution::NotFound,
        };
        Ok(CacheEntry::new(resolution))
    }

    fn plugin(&self, key: &BundleKey) -> Option<PluginHandle> {
        let name = key.plugin_name();
        let version = key.plugin_version();
        self.plugins
            .optionally_get_with((name.to_string(), version.to_string()), || {
                self.resolver.resolve(name, version)
            })
    }
}
