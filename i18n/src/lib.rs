pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod key;
pub mod locale;
pub mod metrics_defs;
pub mod properties;
pub mod resolver;

use cache::ResolutionCache;
use errors::I18nError;
use locale::Locale;
use resolver::{FilesystemPluginResolver, PropertiesBundleLoader};
use std::sync::Arc;

pub use cache::{CacheEntry, Resolution};
pub use key::BundleKey;
pub use resolver::TranslationTable;

/// Builds the bundle cache over the plugin tree in `config` and mounts it
/// under the configured prefix.
pub fn router(config: &config::Config) -> Result<axum::Router, I18nError> {
    let default_locale = Locale::parse_tag(&config.default_locale)
        .ok_or_else(|| I18nError::InvalidLocale(config.default_locale.clone()))?;

    if !config.bundle_root.is_dir() {
        tracing::warn!(
            bundle_root = %config.bundle_root.display(),
            "bundle root is not a directory, every bundle will be reported missing"
        );
    }

    let cache = ResolutionCache::new(
        &config.cache,
        Arc::new(FilesystemPluginResolver::new(&config.bundle_root)),
        Arc::new(PropertiesBundleLoader),
    );
    tracing::info!(
        prefix = %config.prefix,
        default_locale = %default_locale,
        max_capacity = config.cache.max_capacity,
        "serving resource bundles"
    );
    Ok(api::router(&config.prefix, Arc::new(cache), default_locale))
}
