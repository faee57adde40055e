//! Autosave of the working configuration
//!
//! Every save writes `config.json` in the target directory and a timestamped
//! copy under `_autosave/`. Only the newest copies are kept.

use crate::document::{import_from_file, serialize};
use crate::error::{SettingsError, SettingsResult};
use chrono::{DateTime, Local};
use harnessgen_core::ParameterSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the current configuration file
pub const CURRENT_FILE: &str = "config.json";

/// Directory holding the history copies
pub const HISTORY_DIR: &str = "_autosave";

const HISTORY_PREFIX: &str = "config_generation_";

/// Default number of history copies kept
pub const DEFAULT_KEEP: usize = 20;

/// History file name for a save made at `when`
pub fn history_file_name(when: &DateTime<Local>) -> String {
    format!("{}{}.json", HISTORY_PREFIX, when.format("%Y%m%d_%H%M%S"))
}

/// Files written by one autosave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveRecord {
    pub current: PathBuf,
    pub history: PathBuf,
}

/// Autosave target
#[derive(Debug, Clone)]
pub struct Autosave {
    dir: PathBuf,
    keep: usize,
}

impl Autosave {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keep: DEFAULT_KEEP,
        }
    }

    /// Keep at most `keep` history copies (at least one)
    pub fn with_keep(mut self, keep: usize) -> Self {
        self.keep = keep.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    pub fn history_dir(&self) -> PathBuf {
        self.dir.join(HISTORY_DIR)
    }

    /// Save a snapshot now
    pub fn save(&self, params: &ParameterSet, validated: bool) -> SettingsResult<AutosaveRecord> {
        self.save_at(params, validated, &Local::now())
    }

    /// Save a snapshot under the history name for `when`
    pub fn save_at(
        &self,
        params: &ParameterSet,
        validated: bool,
        when: &DateTime<Local>,
    ) -> SettingsResult<AutosaveRecord> {
        let text = serialize(params, validated)?;
        let history_dir = self.history_dir();
        fs::create_dir_all(&history_dir).map_err(|e| SettingsError::io(&history_dir, e))?;

        let current = self.current_path();
        fs::write(&current, &text).map_err(|e| SettingsError::io(&current, e))?;
        let history = history_dir.join(history_file_name(when));
        fs::write(&history, &text).map_err(|e| SettingsError::io(&history, e))?;

        info!("Autosaved configuration to {}", history.display());
        self.prune()?;
        Ok(AutosaveRecord { current, history })
    }

    /// History copies, oldest first
    pub fn history(&self) -> SettingsResult<Vec<PathBuf>> {
        let dir = self.history_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| SettingsError::io(&dir, e))? {
            let path = entry.map_err(|e| SettingsError::io(&dir, e))?.path();
            let is_history = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(HISTORY_PREFIX) && n.ends_with(".json"));
            if is_history {
                files.push(path);
            }
        }
        // Timestamps sort lexically
        files.sort();
        Ok(files)
    }

    /// The current configuration, if one was saved
    pub fn load_current(&self) -> SettingsResult<Option<ParameterSet>> {
        let path = self.current_path();
        if !path.exists() {
            return Ok(None);
        }
        import_from_file(&path).map(Some)
    }

    fn prune(&self) -> SettingsResult<()> {
        let history = self.history()?;
        let excess = history.len().saturating_sub(self.keep);
        for path in &history[..excess] {
            match fs::remove_file(path) {
                Ok(()) => debug!("Removed old autosave {}", path.display()),
                Err(e) => warn!("Could not remove old autosave {}: {}", path.display(), e),
            }
        }
        Ok(())
    }
}
