//! Settings errors

use std::path::PathBuf;

/// Errors that can occur while reading or writing settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("settings I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
