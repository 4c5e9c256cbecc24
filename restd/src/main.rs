use clap::Parser;
use config::Config;
use server::RestdError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod config;
mod observability;
mod server;

#[derive(Parser)]
#[command(version, about = "Paged activity feeds and plugin resource bundles over HTTP")]
enum CliCommand {
    /// Serve the API and admin listeners
    Run {
        #[arg(long, short, default_value = "restd.yaml")]
        config: PathBuf,
    },
    /// Load and validate a config file, then exit
    CheckConfig {
        #[arg(long, short, default_value = "restd.yaml")]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let result = match CliCommand::parse() {
        CliCommand::Run { config } => run(&config),
        CliCommand::CheckConfig { config } => Config::from_file(&config)
            .map(|_| println!("{}: ok", config.display()))
            .map_err(RestdError::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "restd exited");
            eprintln!("restd: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path) -> Result<(), RestdError> {
    let config = Config::from_file(path)?;

    // Installed before the runtime starts.
    let _guard = observability::init_logging(config.logging.as_ref())?;
    observability::init_metrics(config.metrics.as_ref())?;
    tracing::info!(config = %path.display(), "starting restd");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::run(config))
}
