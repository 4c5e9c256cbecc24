use crate::config::{Config, ConfigError};
use axum::Router;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpListener;

#[derive(thiserror::Error, Debug)]
pub enum RestdError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not set up the activity feed: {0}")]
    Paging(#[from] paging::errors::PagingError),
    #[error("could not set up resource bundles: {0}")]
    I18n(#[from] i18n::errors::I18nError),
    #[error("could not install logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    #[error("could not install metrics: {0}")]
    Metrics(String),
}

/// Resource bundles, plus the activity feed when one is configured.
pub fn app(config: &Config) -> Result<Router, RestdError> {
    let mut app = i18n::router(&config.i18n)?;
    if let Some(activities) = &config.activities {
        app = app.merge(paging::router(activities)?);
    }
    Ok(app)
}

/// Serves the API and the admin probes until interrupted. `/ready` turns
/// healthy once the API listener is bound.
pub async fn run(config: Config) -> Result<(), RestdError> {
    let ready = Arc::new(AtomicBool::new(false));
    let is_ready = ready.clone();
    let admin = AdminService::<_, RestdError>::new(move || is_ready.load(Ordering::Relaxed));
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        admin,
    );

    let api_task = async {
        let app = app(&config)?;
        let listener =
            TcpListener::bind(format!("{}:{}", config.listener.host, config.listener.port)).await?;
        tracing::info!(
            host = %config.listener.host,
            port = config.listener.port,
            "api listening"
        );
        ready.store(true, Ordering::Relaxed);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok::<(), RestdError>(())
    };

    tokio::select! {
        result = api_task => result,
        result = admin_task => result,
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received SIGINT, shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    }
}
