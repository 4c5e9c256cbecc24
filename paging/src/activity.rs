//! The activity feed: pending queue items followed by completed runs.
//!
//! Both stores are loaded once from JSON files and adapted to
//! [`Source<Activity>`] so that the merged container only ever sees one
//! element type.

use crate::errors::PagingError;
use crate::merge::MergedContainer;
use crate::pageable::Source;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Work waiting for an executor.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct QueueItem {
    pub id: String,
    pub pipeline: String,
    pub expected_build_number: u64,
    /// Milliseconds since the epoch.
    pub queued_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_of_blockage: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
    Unknown,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Run {
    pub id: String,
    pub pipeline: String,
    pub result: RunResult,
    /// Milliseconds since the epoch.
    pub start_time: u64,
    pub duration_in_millis: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    Queued(QueueItem),
    Run(Run),
}

pub struct QueueStore {
    items: Vec<QueueItem>,
}

impl QueueStore {
    pub fn new(items: Vec<QueueItem>) -> Self {
        QueueStore { items }
    }

    pub fn from_file(path: Option<&Path>) -> Result<Self, PagingError> {
        Ok(QueueStore::new(load_records(path)?))
    }
}

impl Source<Activity> for QueueStore {
    fn stream(&self) -> Box<dyn Iterator<Item = Activity> + '_> {
        Box::new(self.items.iter().cloned().map(Activity::Queued))
    }
}

pub struct RunStore {
    runs: Vec<Run>,
}

impl RunStore {
    pub fn new(runs: Vec<Run>) -> Self {
        RunStore { runs }
    }

    pub fn from_file(path: Option<&Path>) -> Result<Self, PagingError> {
        Ok(RunStore::new(load_records(path)?))
    }
}

impl Source<Activity> for RunStore {
    fn stream(&self) -> Box<dyn Iterator<Item = Activity> + '_> {
        Box::new(self.runs.iter().cloned().map(Activity::Run))
    }
}

/// Queue first, then runs.
pub fn activity_container(queue: QueueStore, runs: RunStore) -> MergedContainer<Activity> {
    let sources: Vec<Arc<dyn Source<Activity>>> = vec![Arc::new(queue), Arc::new(runs)];
    MergedContainer::new(sources)
}

// A missing path means an empty store.
fn load_records<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>, PagingError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let file = File::open(path).map_err(|source| PagingError::SourceIo {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<T> = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        PagingError::SourceFormat {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::info!(path = %path.display(), count = records.len(), "loaded activity source");
    Ok(records)
}
