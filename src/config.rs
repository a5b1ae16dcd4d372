//! Configuration module.
//!
//! Handles loading, validating, and merging `photo-framer.toml`. Stock
//! defaults are overridden by whatever the user file specifies; the file is
//! sparse and only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! max_dimension = 3000      # Longest output edge in pixels
//! background = "#ffffff"    # Shows wherever the photo leaves a gap
//!
//! [mask]
//! enabled = false           # Clip the photo to an inset rectangle
//! left = 0.2                # Fractions of the canvas size
//! top = 0.2
//! width = 0.6
//! height = 0.6
//!
//! [view]
//! default_zoom = 1.0        # Zoom after reset (1.0 = photo just covers)
//! pan_slack = 1.5           # How far the photo may be dragged away
//!
//! [frames]
//! default = "gold"          # Frame used when none is given or remembered
//!
//! [[frames.choices]]
//! name = "gold"
//! path = "frames/gold.png"  # Relative to the config directory
//!
//! [export]
//! filename = "photo-with-frame.png"
//! jpeg_quality = 92
//! ```
//!
//! With no `[[frames.choices]]` the tool works in fixed-frame mode: the frame
//! comes from the command line or from the remembered frame. With choices it
//! works in selectable mode and `--frame-name` picks one.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{CompositorSettings, MaskRegion, PanSlack, Quality, Zoom};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILENAME: &str = "photo-framer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `photo-framer.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Output canvas settings.
    pub canvas: CanvasConfig,
    /// Optional clip rectangle for the photo layer.
    pub mask: MaskConfig,
    /// Zoom and pan behaviour.
    pub view: ViewConfig,
    /// Frame selection.
    pub frames: FramesConfig,
    /// Export settings.
    pub export: ExportConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "canvas.max_dimension must be positive".into(),
            ));
        }
        parse_hex_color(&self.canvas.background)?;
        self.mask.validate()?;
        if !(self.view.default_zoom.is_finite() && self.view.default_zoom > 0.0) {
            return Err(ConfigError::Validation(
                "view.default_zoom must be a positive number".into(),
            ));
        }
        if !(self.view.pan_slack.is_finite() && self.view.pan_slack > 0.0) {
            return Err(ConfigError::Validation(
                "view.pan_slack must be a positive number".into(),
            ));
        }
        self.frames.validate()?;
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(ConfigError::Validation(
                "export.jpeg_quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// Compositor settings derived from this config.
    pub fn compositor_settings(&self) -> Result<CompositorSettings, ConfigError> {
        Ok(CompositorSettings {
            max_dimension: self.canvas.max_dimension,
            mask: self.mask.region(),
            pan_slack: PanSlack(self.view.pan_slack),
            background: parse_hex_color(&self.canvas.background)?,
        })
    }

    pub fn default_zoom(&self) -> Zoom {
        Zoom::new_or(self.view.default_zoom, Zoom::default())
    }

    pub fn jpeg_quality(&self) -> Quality {
        Quality::new(self.export.jpeg_quality)
    }
}

/// Output canvas settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Longest allowed output edge. Larger frames are scaled down to fit.
    pub max_dimension: u32,
    /// Opaque fill behind the photo, as `#rgb` or `#rrggbb`.
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            max_dimension: 3000,
            background: "#ffffff".to_string(),
        }
    }
}

/// Clip rectangle for the photo layer, as fractions of the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskConfig {
    pub enabled: bool,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            left: 0.2,
            top: 0.2,
            width: 0.6,
            height: 0.6,
        }
    }
}

impl MaskConfig {
    /// The clip region, or `None` when the mask is disabled.
    pub fn region(&self) -> Option<MaskRegion> {
        self.enabled.then_some(MaskRegion {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fractions = [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
        ];
        for (key, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "mask.{key} must be between 0 and 1"
                )));
            }
        }
        if self.width == 0.0 || self.height == 0.0 {
            return Err(ConfigError::Validation(
                "mask.width and mask.height must be non-zero".into(),
            ));
        }
        if self.left + self.width > 1.0 || self.top + self.height > 1.0 {
            return Err(ConfigError::Validation(
                "mask must lie inside the canvas".into(),
            ));
        }
        Ok(())
    }
}

/// Zoom and pan behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Zoom restored by reset and used before any zoom input arrives.
    pub default_zoom: f64,
    /// The photo may be dragged up to `pan_slack × max(photo, area)` from center.
    pub pan_slack: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_zoom: 1.0,
            pan_slack: 1.5,
        }
    }
}

/// A named frame the user can pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameChoice {
    pub name: String,
    /// PNG path, relative to the config directory unless absolute.
    pub path: PathBuf,
}

/// Frame selection: fixed (no choices) or selectable (a named set).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramesConfig {
    /// Name of the choice used when no frame is given or remembered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub choices: Vec<FrameChoice>,
}

impl FramesConfig {
    pub fn is_selectable(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Resolve a choice by name to a path, relative to `base`.
    pub fn resolve(&self, name: &str, base: &Path) -> Option<PathBuf> {
        self.choices
            .iter()
            .find(|c| c.name == name)
            .map(|c| base.join(&c.path))
    }

    /// Path of the default choice, if one is configured.
    pub fn default_path(&self, base: &Path) -> Option<PathBuf> {
        self.default
            .as_deref()
            .and_then(|name| self.resolve(name, base))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (i, choice) in self.choices.iter().enumerate() {
            if choice.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "frames.choices names must not be empty".into(),
                ));
            }
            if self.choices[..i].iter().any(|c| c.name == choice.name) {
                return Err(ConfigError::Validation(format!(
                    "duplicate frame name: {}",
                    choice.name
                )));
            }
        }
        if let Some(default) = &self.default {
            if !self.choices.iter().any(|c| &c.name == default) {
                return Err(ConfigError::Validation(format!(
                    "frames.default names unknown frame: {default}"
                )));
            }
        }
        Ok(())
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Output file name when none is given. The extension picks the format.
    pub filename: String,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: "photo-with-frame.png".to_string(),
            jpeg_quality: 92,
        }
    }
}

/// Parse `#rgb` or `#rrggbb` into an opaque color.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>, ConfigError> {
    let invalid = || ConfigError::Validation(format!("invalid color: {value:?}"));
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = channel(&c.to_string())?;
                rgb[i] = v * 17;
            }
            Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Ok(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        _ => Err(invalid()),
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    // A derive-serialized struct of plain fields always converts.
    toml::Value::try_from(AppConfig::default())
        .unwrap_or_else(|_| toml::Value::Table(toml::map::Map::new()))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `photo-framer.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `photo-framer.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `photo-framer.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-framer configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Output canvas
# ---------------------------------------------------------------------------
[canvas]
# The canvas takes the frame's size, scaled down so neither edge exceeds this.
max_dimension = 3000

# Opaque fill behind the photo (#rgb or #rrggbb). Visible wherever the photo
# does not cover the canvas or the mask.
background = "#ffffff"

# ---------------------------------------------------------------------------
# Mask
# ---------------------------------------------------------------------------
[mask]
# When enabled the photo is fitted into, and clipped to, this rectangle.
# When disabled the photo fills the whole canvas under the frame.
enabled = false

# Fractions (0..1) of the canvas size.
left = 0.2
top = 0.2
width = 0.6
height = 0.6

# ---------------------------------------------------------------------------
# View
# ---------------------------------------------------------------------------
[view]
# Zoom restored by reset. 1.0 means the photo just covers the visible area.
default_zoom = 1.0

# The photo may be dragged up to pan_slack x max(photo size, area size)
# away from center along each axis.
pan_slack = 1.5

# ---------------------------------------------------------------------------
# Frames
# ---------------------------------------------------------------------------
[frames]
# Without choices, the frame comes from --frame or the remembered frame.
# Add choices to pick frames by name with --frame-name.
#
# default = "gold"
#
# [[frames.choices]]
# name = "gold"
# path = "frames/gold.png"
choices = []

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Default output file. The extension picks the format: png, jpg/jpeg, webp.
filename = "photo-with-frame.png"

# JPEG quality (1 = worst, 100 = best). Ignored for png and webp.
jpeg_quality = 92
"##
}
