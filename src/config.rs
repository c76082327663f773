//! Application configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/vesktop-keybinds/config.json` when the file
//! exists.  The top-level schema uses an `"ipc"` key so the file can grow
//! further sections without breaking older files.
//!
//! # Example
//!
//! ```json
//! {
//!   "ipc": {
//!     "name": "vesktop-ipc",
//!     "runtime_dir": "/run/user/1000",
//!     "read_buffer": 1024
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional; `{}` is a valid file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint settings.
    #[serde(default)]
    pub ipc: IpcConfig,
}

/// Endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Base name of the FIFO file / named pipe.
    pub name: String,
    /// Directory holding the FIFO.  When unset it is resolved from
    /// `XDG_RUNTIME_DIR`, then `TMP`, then `/tmp`.  Ignored on Windows.
    pub runtime_dir: Option<PathBuf>,
    /// Size of a single read from an endpoint, in bytes.
    pub read_buffer: usize,
}

/// Default endpoint base name.
pub const DEFAULT_IPC_NAME: &str = "vesktop-ipc";

/// Largest accepted `ipc.read_buffer`.  Tokens are a few dozen bytes.
pub const MAX_READ_BUFFER: usize = 64 * 1024;

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_IPC_NAME.into(),
            runtime_dir: None,
            read_buffer: 1024,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        if config.ipc.name.trim().is_empty() {
            return Err(ConfigError(format!("{}: ipc.name must not be empty", path.display())));
        }
        if config.ipc.read_buffer == 0 {
            return Err(ConfigError(format!("{}: ipc.read_buffer must be > 0", path.display())));
        }
        if config.ipc.read_buffer > MAX_READ_BUFFER {
            return Err(ConfigError(format!(
                "{}: ipc.read_buffer must be <= {}",
                path.display(),
                MAX_READ_BUFFER
            )));
        }
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
