//! Persisted viewer settings.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::Variant;
use crate::overlay::DEFAULT_MARGIN;

/// Settings stored as JSON. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the `dinosaurs_<variant>.yaml` feeds.
    pub data_dir: PathBuf,
    pub variant: Variant,
    pub show_ai: bool,
    /// Overlay gap in host units. Unset means the host's own default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_margin: Option<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            variant: Variant::default(),
            show_ai: false,
            overlay_margin: None,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to defaults if the file does
    /// not exist.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes settings to `path`, creating parent directories.
    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tokio::fs::write(path, text).await.map_err(io_err)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Overlay margin, falling back to [`DEFAULT_MARGIN`].
    pub fn margin(&self) -> i32 {
        self.overlay_margin.unwrap_or(DEFAULT_MARGIN)
    }

    /// Feed file name for the selected variant.
    pub fn feed_name(&self) -> String {
        self.variant.file_name()
    }
}
