//! Remembered shell state.
//!
//! The CLI remembers the folders, file and flags of the last run so repeated
//! invocations can omit them. The record is small JSON:
//!
//! ```json
//! {
//!   "input_dir": "/photos/inbox",
//!   "output_dir": "/photos/wallpapers",
//!   "delete_after": false,
//!   "single_file": "/photos/keep/beach.jpg",
//!   "single_output_dir": "/photos/wallpapers"
//! }
//! ```
//!
//! ## Location
//!
//! - Windows: `%APPDATA%\Cropper4096\state.json`
//! - Elsewhere: `~/.cropper4096.json`
//!
//! The state is a convenience. [`ShellState::load_or_default`] treats an
//! unreadable or corrupt file as empty, and saving failures are logged by the
//! caller instead of failing the run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Last-used paths and flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub delete_after: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_file: Option<PathBuf>,
    /// Output folder used with a single selected file. Falls back to `output_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_output_dir: Option<PathBuf>,
}

impl ShellState {
    pub fn load(path: &Path) -> Result<Self, StateError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Like [`Self::load`], but a broken file yields the default state.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Output folder for single-file runs.
    pub fn single_output(&self) -> Option<&Path> {
        self.single_output_dir
            .as_deref()
            .or(self.output_dir.as_deref())
    }
}

/// Default location of the state file, if a home directory can be found.
pub fn default_state_path() -> Option<PathBuf> {
    if cfg!(windows) {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("Cropper4096").join("state.json"));
        }
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".cropper4096.json"))
}
