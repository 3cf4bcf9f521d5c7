//! Application configuration management.
//!
//! This module handles loading and saving application-wide configuration,
//! currently the snapshot cache location. The cache path is resolved here and
//! threaded explicitly through the entry points; nothing reads it from global
//! state.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Override for the snapshot cache location.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to the default platform-specific path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Effective snapshot cache path: the configured override, or the
    /// platform cache directory, or the working directory as a last resort.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        if let Some(path) = &self.snapshot_path {
            return path.clone();
        }
        Self::default_snapshot_path()
    }

    /// Default platform-specific snapshot location.
    #[must_use]
    pub fn default_snapshot_path() -> PathBuf {
        ProjectDirs::from("com", "phototriage", "phototriage").map_or_else(
            || PathBuf::from("phototriage-timestamps.json"),
            |dirs| dirs.cache_dir().join("timestamps.json"),
        )
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "phototriage", "phototriage")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}
