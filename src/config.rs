// SPDX-License-Identifier: GPL-3.0-only

//! User configuration handling
//!
//! Config is stored as JSON under the user config directory. Load failures
//! fall back to defaults; save failures are logged and ignored.

use crate::backends::camera::types::CameraFacing;
use crate::constants::{APP_NAME, DEFAULT_FONT_SCALE, DEFAULT_LABEL_TEXT, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Camera facing to start with
    pub facing: CameraFacing,
    /// Mirror front-camera captures horizontally (selfie behavior)
    pub mirror_front_capture: bool,
    /// Text shown in the draggable overlay label
    pub label_text: String,
    /// Overlay label font scale
    pub label_font_scale: f32,
    /// Output format for exported photos
    pub output_format: OutputFormat,
    /// Directory holding custom filter overlay images (filter1/filter2)
    pub filter_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Back,
            mirror_front_capture: true,
            label_text: DEFAULT_LABEL_TEXT.to_string(),
            label_font_scale: DEFAULT_FONT_SCALE,
            output_format: OutputFormat::default(),
            filter_dir: None,
        }
    }
}

impl Config {
    /// Path of the config file (`<config_dir>/snapcam/config.json`)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.json"))
    }

    /// Load the config from disk, falling back to defaults on any failure
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "Config file is invalid, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist the config to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            warn!("No config directory available, settings not saved");
            return;
        };

        let result = path
            .parent()
            .map(std::fs::create_dir_all)
            .transpose()
            .map_err(|e| e.to_string())
            .and_then(|_| serde_json::to_string_pretty(self).map_err(|e| e.to_string()))
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));

        if let Err(e) = result {
            warn!(error = %e, "Failed to save config");
        }
    }
}
