//! modsync configuration file parsing (modsync.toml)
//!
//! Loaded once at startup and threaded into each operation; nothing reads it
//! ambiently during a sync. Persisting a changed directory is one explicit
//! `store` call.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Config file name
pub const CONFIG_FILE: &str = "modsync.toml";

/// modsync configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote server base address, e.g. "http://192.168.31.96:21010"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Last selected sync directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from `path`.
    ///
    /// Returns the default config if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| SyncError::File {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| SyncError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Persist the config back to `path`.
    ///
    /// # Errors
    /// Returns an error if encoding or the write fails.
    pub fn store(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SyncError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|source| SyncError::File {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured server URL, or `NotConfigured` before any network work.
    ///
    /// # Errors
    /// Returns `SyncError::NotConfigured` if unset.
    pub fn server_url(&self) -> Result<&str> {
        self.server_url.as_deref().ok_or(SyncError::NotConfigured)
    }
}
