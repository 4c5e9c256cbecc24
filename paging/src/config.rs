use serde::Deserialize;
use std::path::PathBuf;

fn default_prefix() -> String {
    "activities".into()
}

/// Where the activity feed is mounted and where its two sources live.
/// A source without a file is served as empty.
#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub queue_file: Option<PathBuf>,
    pub runs_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefix: default_prefix(),
            queue_file: None,
            runs_file: None,
        }
    }
}
