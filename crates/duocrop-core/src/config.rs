//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document (or an empty JS
//! object on the WASM side) yields the standard Card/Detail setup.
//!
//! ```toml
//! max_source_bytes = 10485760
//! initial_coverage = 0.8
//! filter = "lanczos3"
//! storage_folder = "vault"
//! ```
//!
//! A `[modes]` table, when present, must describe both modes in full.

use serde::{Deserialize, Serialize};

use crate::crop::AspectRatio;
use crate::decode::FilterType;
use crate::error::ConfigError;
use crate::mode::{Mode, PerMode};
use crate::raster::OutputSpec;
use crate::source::MAX_SOURCE_BYTES;

/// Allowed relative deviation between a mode's aspect and its output sizes.
const ASPECT_TOLERANCE: f64 = 0.01;

/// Geometry and outputs of a single mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub aspect: AspectRatio,
    pub output: OutputSpec,
    pub preview: OutputSpec,
}

impl ModeConfig {
    pub fn card() -> Self {
        Self {
            aspect: AspectRatio::CARD,
            output: OutputSpec::jpeg(640, 360),
            preview: OutputSpec::jpeg(160, 90),
        }
    }

    pub fn detail() -> Self {
        Self {
            aspect: AspectRatio::DETAIL,
            output: OutputSpec::jpeg(400, 600),
            preview: OutputSpec::jpeg(160, 240),
        }
    }
}

fn default_modes() -> PerMode<ModeConfig> {
    PerMode::new(ModeConfig::card(), ModeConfig::detail())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest accepted source file in bytes.
    pub max_source_bytes: u64,
    /// Fraction of the display width the default crop starts at.
    pub initial_coverage: f64,
    /// Smallest crop width in display pixels reachable by resizing.
    pub min_crop_width: f64,
    /// Resampling filter shared by previews and exports.
    pub filter: FilterType,
    /// Folder segment of derivative storage paths.
    pub storage_folder: String,
    pub modes: PerMode<ModeConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: MAX_SOURCE_BYTES,
            initial_coverage: 0.8,
            min_crop_width: 16.0,
            filter: FilterType::default(),
            storage_folder: "vault".to_string(),
            modes: default_modes(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_source_bytes == 0 {
            return Err(ConfigError::Invalid("max_source_bytes must be positive".into()));
        }
        if !(self.initial_coverage > 0.0 && self.initial_coverage <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "initial_coverage must be in (0, 1], got {}",
                self.initial_coverage
            )));
        }
        if !(self.min_crop_width.is_finite() && self.min_crop_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_crop_width must be a positive number, got {}",
                self.min_crop_width
            )));
        }
        if self.storage_folder.is_empty() || self.storage_folder.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "storage_folder must be a single path segment, got {:?}",
                self.storage_folder
            )));
        }

        for mode in Mode::ALL {
            let mode_config = &self.modes[mode];
            let aspect = mode_config.aspect;
            if aspect.width == 0 || aspect.height == 0 {
                return Err(ConfigError::Invalid(format!("{mode} aspect must be non-zero")));
            }
            for (what, target) in [("output", &mode_config.output), ("preview", &mode_config.preview)] {
                if target.width == 0 || target.height == 0 {
                    return Err(ConfigError::Invalid(format!(
                        "{mode} {what} size must be non-zero"
                    )));
                }
                if !aspect.matches(target.width, target.height, ASPECT_TOLERANCE) {
                    return Err(ConfigError::Invalid(format!(
                        "{mode} {what} {}x{} does not match aspect {}:{}",
                        target.width, target.height, aspect.width, aspect.height
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn outputs(&self) -> PerMode<OutputSpec> {
        PerMode::new(self.modes.card.output, self.modes.detail.output)
    }

    pub fn previews(&self) -> PerMode<OutputSpec> {
        PerMode::new(self.modes.card.preview, self.modes.detail.preview)
    }
}
