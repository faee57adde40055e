//! HarnessGen Settings Crate
//!
//! Handles configuration snapshots on disk, the built-in presets, autosave
//! history and the application settings file.

pub mod autosave;
pub mod config;
pub mod document;
pub mod error;
pub mod presets;

pub use autosave::{history_file_name, Autosave, AutosaveRecord};
pub use config::AppSettings;
pub use document::{
    deserialize, export_to_file, import_from_file, serialize, Metadata, SnapshotDocument,
    DOCUMENT_VERSION,
};
pub use error::{SettingsError, SettingsResult};
pub use presets::{preset, Preset, PRESETS};
