//! Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::driver::DriverConfig;
use crate::error::{Error, Result};
use crate::patterns::PatternCatalog;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "CONWAY_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Grid height in cells
    pub rows: usize,
    /// Grid width in cells
    pub cols: usize,
    /// Milliseconds between generations
    pub interval_ms: u64,
    /// Frames in one animation cycle
    pub frames_per_cycle: u64,
    /// Whether the animation starts over after a cycle
    pub repeat: bool,
    /// JSON pattern catalog to use instead of the built-in one
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rows: 60,
            cols: 60,
            interval_ms: 150,
            frames_per_cycle: 1000,
            repeat: true,
            catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Read the file named by `CONWAY_CONFIG`, or fall back to defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine or driver cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.interval_ms == 0 {
            return Err(Error::InvalidConfig("interval_ms must be positive".into()));
        }
        Ok(())
    }

    /// The configured catalog, or the built-in one when none is set.
    pub fn catalog(&self) -> Result<PatternCatalog> {
        match &self.catalog_path {
            Some(path) => {
                info!("Loading pattern catalog from {}", path.display());
                PatternCatalog::from_path(path)
            }
            None => Ok(PatternCatalog::builtin()),
        }
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            interval: Duration::from_millis(self.interval_ms),
            frames_per_cycle: self.frames_per_cycle,
            repeat: self.repeat,
        }
    }
}
