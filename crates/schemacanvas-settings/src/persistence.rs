//! Settings Persistence
//!
//! Loads and saves the canvas configuration, falling back to defaults when
//! no file exists yet and creating the configuration directory on save.

use crate::config::CanvasConfig;
use crate::error::{SettingsError, SettingsResult};
use std::path::{Path, PathBuf};

/// Settings persistence layer
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    config: CanvasConfig,
    path: PathBuf,
}

impl SettingsPersistence {
    /// Create a persistence layer with default config bound to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config: CanvasConfig::default(),
            path: path.into(),
        }
    }

    /// Create a persistence layer bound to the platform default path
    pub fn with_default_path() -> SettingsResult<Self> {
        Ok(Self::new(CanvasConfig::default_path()?))
    }

    /// Load settings from `path`, or use defaults when the file is missing
    pub fn load_or_default(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::info!(
                "No canvas config at {}, using defaults",
                path.display()
            );
            return Ok(Self::new(path));
        }

        let config = CanvasConfig::load_from_file(&path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;
        Ok(Self { config, path })
    }

    /// Save settings, creating the parent directory if needed
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        self.config
            .save_to_file(&self.path)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", self.path.display(), e)))
    }

    /// Get reference to config
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Get mutable reference to config
    pub fn config_mut(&mut self) -> &mut CanvasConfig {
        &mut self.config
    }

    /// Path the settings are bound to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        Ok(self.config.validate()?)
    }
}
