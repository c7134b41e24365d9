//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`] on top of a plain file.  Missing keys take
//! their defaults (`#[serde(default)]` on [`SystemConfig`]), so a file
//! only needs to list what it overrides:
//!
//! ```json
//! { "rate_profile": "unfiltered", "unknown_command_policy": "report" }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

/// Config loaded from a JSON file on disk.
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => {
                warn!("Config read failed ({}): {}", self.path.display(), e);
                ConfigError::IoError
            }
        })?;
        let cfg = parse(&text)?;
        info!("Loaded config from {}", self.path.display());
        Ok(cfg)
    }
}

/// Deserialize and validate a JSON config document.
pub fn parse(text: &str) -> Result<SystemConfig, ConfigError> {
    let cfg: SystemConfig = serde_json::from_str(text).map_err(|e| {
        warn!("Config JSON rejected: {}", e);
        ConfigError::Corrupted
    })?;
    cfg.validate()?;
    Ok(cfg)
}
