use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Cache capacity cannot be 0")]
    ZeroCacheCapacity,

    #[error("Empty URL prefix")]
    EmptyPrefix,

    #[error("Activity feed and resource bundles are both mounted at /{0}")]
    PrefixConflict(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

fn default_admin_listener() -> Listener {
    Listener {
        host: "127.0.0.1".into(),
        port: 8081,
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Serves the activity feed and the resource bundles
    pub listener: Listener,
    /// Serves `/health` and `/ready`
    #[serde(default = "default_admin_listener")]
    pub admin_listener: Listener,
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
    pub i18n: i18n::config::Config,
    /// The feed is not mounted when absent.
    pub activities: Option<paging::config::Config>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.metrics.as_ref().is_some_and(|m| m.statsd_port == 0) {
            return Err(ValidationError::InvalidPort);
        }

        if self.i18n.cache.max_capacity == 0 {
            return Err(ValidationError::ZeroCacheCapacity);
        }

        let bundle_prefix = self.i18n.prefix.trim_matches('/');
        if bundle_prefix.is_empty() {
            return Err(ValidationError::EmptyPrefix);
        }
        if let Some(activities) = &self.activities {
            let activity_prefix = activities.prefix.trim_matches('/');
            if activity_prefix.is_empty() {
                return Err(ValidationError::EmptyPrefix);
            }
            if activity_prefix == bundle_prefix {
                return Err(ValidationError::PrefixConflict(bundle_prefix.to_string()));
            }
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Validation(#[from] ValidationError),
}
