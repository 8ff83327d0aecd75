//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over `data/pump-config.json` (or whatever
//! path `--config` names).  A missing file is not an error; unreadable or
//! malformed content is.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::PumpConfig;

pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<Option<Vec<PumpConfig>>, ConfigError> {
        debug!("config: looking for {}", self.path.display());
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("config: {} not found", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let pumps: Vec<PumpConfig> =
            serde_json::from_str(&text).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        info!("config: {} pump(s) from {}", pumps.len(), self.path.display());
        Ok(Some(pumps))
    }
}
