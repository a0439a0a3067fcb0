// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from `boxmark.yaml` in the working directory, or from
//! the file named by `BOXMARK_CONFIG`. Every field is optional; a missing
//! file means defaults.

use crate::models::classes::{ClassList, LabelClass};
use crate::util::geometry::ScaleBounds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BOXMARK_CONFIG";

/// Default config file name.
pub const CONFIG_FILE: &str = "boxmark.yaml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub editor: EditorConfig,
    pub window: WindowConfig,
    pub classes: Vec<LabelClass>,
}

/// Tunables of the annotation canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Margin in pixels kept around the image by fit-to-screen.
    pub fit_padding: f64,
    /// Pixel distance within which a pointer grabs a resize handle.
    pub handle_tolerance_px: f64,
    /// Smallest normalized drag extent (per axis) that creates a box.
    pub min_draw_extent: f64,
    /// Smallest normalized width/height a resize can produce.
    pub min_box_size: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale multiplier per wheel notch.
    pub wheel_zoom_factor: f64,
    /// Scale multiplier of the zoom buttons.
    pub button_zoom_factor: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fit_padding: 64.0,
            handle_tolerance_px: 8.0,
            min_draw_extent: 0.01,
            min_box_size: 0.005,
            min_scale: 0.1,
            max_scale: 20.0,
            wheel_zoom_factor: 1.1,
            button_zoom_factor: 1.2,
        }
    }
}

impl EditorConfig {
    pub fn scale_bounds(&self) -> ScaleBounds {
        ScaleBounds {
            min: self.min_scale,
            max: self.max_scale,
        }
    }
}

/// Native window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl AppConfig {
    /// Class list to start with, falling back to the built-in defaults.
    pub fn initial_classes(&self) -> ClassList {
        if self.classes.is_empty() {
            default_classes()
        } else {
            ClassList::from(self.classes.clone())
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load the config from the default location.
    ///
    /// A missing file yields defaults; a broken one is logged and ignored.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{:#}", e);
                Self::default()
            }
        }
    }
}

/// Classes available before the user adds any.
pub fn default_classes() -> ClassList {
    ClassList::from(vec![
        LabelClass::new(0, "grdg"),
        LabelClass::new(1, "car"),
        LabelClass::new(2, "dog"),
        LabelClass::new(3, "cat"),
        LabelClass::new(4, "chair"),
        LabelClass::new(5, "bottle"),
    ])
}
