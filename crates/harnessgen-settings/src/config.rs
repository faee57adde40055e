//! Application settings
//!
//! Where output goes and how it is written. Stored as TOML or JSON, chosen
//! by the file extension, in the platform configuration directory by
//! default.

use crate::autosave::DEFAULT_KEEP;
use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application name used for the configuration directory
const APP_DIR: &str = "harnessgen";

/// Settings file name inside the configuration directory
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(format!(
                "settings file must be .json or .toml, got {}",
                other.unwrap_or("no extension")
            ))),
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Directory generated files are written to
    pub output_directory: PathBuf,
    /// Put each profile role on its own DXF layer
    #[serde(default = "default_true")]
    pub layer_per_role: bool,
    /// Write an autosave copy of the configuration with every generation
    #[serde(default = "default_true")]
    pub write_autosave: bool,
    /// Number of autosave copies kept
    #[serde(default = "default_keep")]
    pub autosave_keep: usize,
}

fn default_true() -> bool {
    true
}

fn default_keep() -> usize {
    DEFAULT_KEEP
}

impl Default for AppSettings {
    fn default() -> Self {
        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            output_directory: base.join(APP_DIR),
            layer_per_role: true,
            write_autosave: true,
            autosave_keep: DEFAULT_KEEP,
        }
    }
}

impl AppSettings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings file, if the platform has a configuration directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))?;

        let settings: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to file (JSON or TOML)
    ///
    /// Missing parent directories are created.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
        }
        fs::write(path, content).map_err(|e| SettingsError::io(path, e))?;

        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        if self.output_directory.as_os_str().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output_directory".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.autosave_keep == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "autosave_keep".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
