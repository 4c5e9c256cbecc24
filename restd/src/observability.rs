//! Logging, error reporting and metrics for the process.
use crate::config::{LoggingConfig, MetricsConfig};
use crate::server::RestdError;
use metrics_exporter_statsd::StatsdBuilder;
use shared::metrics_defs::describe_all;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const METRICS_PREFIX: &str = "restd";

/// Keeps the sentry client alive; events are flushed when it is dropped.
pub struct Guard {
    _sentry: Option<sentry::ClientInitGuard>,
}

/// Installs the global tracing subscriber and, when configured, the sentry
/// client. `RUST_LOG` selects what is logged and defaults to `info`.
pub fn init_logging(logging: Option<&LoggingConfig>) -> Result<Guard, RestdError> {
    let sentry = logging.map(|logging| {
        sentry::init((
            logging.sentry_dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry.as_ref().map(|_| sentry::integrations::tracing::layer()))
        .try_init()?;

    Ok(Guard { _sentry: sentry })
}

/// Sends metrics to statsd when configured. Without it the `metrics` macros
/// are no-ops.
pub fn init_metrics(metrics: Option<&MetricsConfig>) -> Result<(), RestdError> {
    let Some(metrics) = metrics else {
        tracing::info!("no statsd configured, metrics are discarded");
        return Ok(());
    };

    let recorder = StatsdBuilder::from(metrics.statsd_host.as_str(), metrics.statsd_port)
        .build(Some(METRICS_PREFIX))
        .map_err(|e| RestdError::Metrics(e.to_string()))?;
    metrics::set_global_recorder(recorder).map_err(|e| RestdError::Metrics(e.to_string()))?;

    describe_all(paging::metrics_defs::ALL_METRICS);
    describe_all(i18n::metrics_defs::ALL_METRICS);

    tracing::info!(
        host = %metrics.statsd_host,
        port = metrics.statsd_port,
        "sending metrics to statsd"
    );
    Ok(())
}
