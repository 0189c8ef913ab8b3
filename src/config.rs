use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::Justify;

/// Errors that can occur while loading or saving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

const DEFAULT_SAYING: &str =
    "Fool me one time,\nshame on you.\nFool me twice,\ncan't put the blame on you";

/// Tunable values for the canvas, the interaction controller and the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old settings
pub struct Settings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Directory the built-in catalog resolves against
    pub resource_root: PathBuf,
    /// Edge length of a freshly placed stamp
    pub default_stamp_size: f32,
    /// Smallest edge an interactive resize can shrink a stamp to
    pub min_stamp_size: f32,
    /// Distance from a stamp's bottom-right corner that counts as its resize handle
    pub handle_radius: f32,
    /// 1-100
    pub jpeg_quality: u8,
    pub initial_text: String,
    pub font_size: u32,
    pub justify: Justify,
    pub gradient_opacity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            resource_root: PathBuf::from("resources"),
            default_stamp_size: 64.0,
            min_stamp_size: 10.0,
            handle_radius: 15.0,
            jpeg_quality: 90,
            initial_text: DEFAULT_SAYING.to_owned(),
            font_size: 36,
            justify: Justify::Left,
            gradient_opacity: 0.75,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`Settings::load`], but logs the problem and falls back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(self.min_stamp_size > 0.0) || self.default_stamp_size < self.min_stamp_size {
            return Err(ConfigError::Invalid(format!(
                "stamp sizes must satisfy 0 < min ({}) <= default ({})",
                self.min_stamp_size, self.default_stamp_size
            )));
        }
        if self.font_size == 0 {
            return Err(ConfigError::Invalid("font size must be positive".to_owned()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "jpeg quality must be within 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if !(0.0..=1.0).contains(&self.gradient_opacity) {
            return Err(ConfigError::Invalid(format!(
                "gradient opacity must be within 0-1, got {}",
                self.gradient_opacity
            )));
        }
        Ok(())
    }
}
