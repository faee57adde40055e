//! Error types for the settings crate.

use harnessgen_core::ParameterError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// I/O error during file operations.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// A stored parameter name or value was rejected.
    #[error("Invalid parameter: {0}")]
    Parameter(#[from] ParameterError),

    /// The file extension or document version is not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The document parsed but does not have the expected shape.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// An application setting is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}

impl SettingsError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
