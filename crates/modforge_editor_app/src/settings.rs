// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings.
//!
//! Settings live in an optional RON file. Missing fields take their defaults,
//! so an empty file is a valid settings file.

use crate::history::MAX_HISTORY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.ron";

/// Default log filter directives
pub const DEFAULT_LOG_FILTER: &str = "modforge_editor_app=debug,modforge_editor_graph=info";

/// Error when reading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON
    #[error("Invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// User preferences for the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Save the project after every committed edit
    pub auto_save: bool,
    /// Maximum undo depth
    pub history_depth: usize,
    /// `tracing` filter directives, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            history_depth: MAX_HISTORY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EditorSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&content)?)
    }

    /// Load settings, falling back to defaults when the file is missing.
    ///
    /// Returns the error alongside the defaults when the file exists but can't
    /// be used, so the caller can report it once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<SettingsError>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load(path) {
            Ok(settings) => (settings, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }
}
