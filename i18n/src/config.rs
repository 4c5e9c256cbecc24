use serde::Deserialize;
use std::path::PathBuf;

fn default_prefix() -> String {
    "blueocean-i18n".into()
}

fn default_locale() -> String {
    "en".into()
}

fn default_max_capacity() -> u64 {
    10_000
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Config {
    /// Directory holding one subdirectory per plugin.
    pub bundle_root: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Used when a request names no locale and sends no usable
    /// `Accept-Language` header.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Entries live until evicted for capacity when unset.
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_capacity: default_max_capacity(),
            ttl_secs: None,
        }
    }
}
