pub mod activity;
pub mod api;
pub mod config;
pub mod errors;
pub mod interceptor;
pub mod merge;
pub mod metrics_defs;
pub mod pageable;
pub mod window;

use activity::{QueueStore, RunStore, activity_container};
use errors::PagingError;
use std::sync::Arc;

pub use pageable::{Pageable, Source};
pub use window::{DEFAULT_LIMIT, PageWindow};

/// Loads the activity sources named in `config` and mounts the feed under
/// its prefix.
pub fn router(config: &config::Config) -> Result<axum::Router, PagingError> {
    let queue = QueueStore::from_file(config.queue_file.as_deref())?;
    let runs = RunStore::from_file(config.runs_file.as_deref())?;
    let container = Arc::new(activity_container(queue, runs));
    Ok(api::router(&config.prefix, container))
}
