//! Feed loading errors

use std::path::PathBuf;

/// Errors that can occur while fetching or parsing a data feed.
///
/// These never reach the host directly: the sheet turns them into a single
/// error row and logs the detail.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The feed file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("invalid YAML in '{name}': {source}")]
    Yaml {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document is not valid JSON.
    #[error("invalid JSON in '{name}': {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The file extension names a format we cannot parse.
    #[error("unsupported feed format for '{0}'")]
    UnsupportedFormat(String),
}

impl FeedError {
    /// Creates a new I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
