//! Configuration for Wallpaint
//!
//! Supports JSON and TOML file formats. The default file lives in the
//! platform config directory (`<config_dir>/wallpaint/config.toml`).
//!
//! Configuration is organized into sections:
//! - Planner (service URL, request timeout)
//! - Animation (step delay, stroke floor)
//! - Surface (pixel size of the drawing surface)
//! - Deploy (default form inputs, missing-input handling)

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wallpaint_core::constants::{
    DEFAULT_PLANNER_BASE_URL, DEFAULT_STEP_DELAY_MS, DEFAULT_SURFACE_HEIGHT_PX,
    DEFAULT_SURFACE_WIDTH_PX, DEFAULT_TOOL_WIDTH_M, MIN_STROKE_PX,
};

/// What a deploy does when its inputs are missing or unparseable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingInputPolicy {
    /// Abort silently, leaving the status untouched
    #[default]
    Ignore,
    /// Show the input problem as an error
    Report,
}

impl std::fmt::Display for MissingInputPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignore => write!(f, "ignore"),
            Self::Report => write!(f, "report"),
        }
    }
}

/// Planning service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// API root, e.g. `http://127.0.0.1:8000/api/v1`
    pub base_url: String,
    /// Request timeout; unset waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLANNER_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

/// Animation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Pause between segments in milliseconds (lower is faster)
    pub step_delay_ms: f64,
    /// Minimum stroke width in pixels
    pub min_stroke_px: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            min_stroke_px: MIN_STROKE_PX,
        }
    }
}

/// Drawing surface size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            width_px: DEFAULT_SURFACE_WIDTH_PX,
            height_px: DEFAULT_SURFACE_HEIGHT_PX,
        }
    }
}

/// Default obstacle rectangle, in meters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleSettings {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// Deploy defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    pub missing_input_policy: MissingInputPolicy,
    pub wall_width: f64,
    pub wall_height: f64,
    pub obstacle: ObstacleSettings,
    pub tool_width: f64,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            missing_input_policy: MissingInputPolicy::default(),
            wall_width: 4.0,
            wall_height: 3.0,
            obstacle: ObstacleSettings::default(),
            tool_width: DEFAULT_TOOL_WIDTH_M,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub planner: PlannerSettings,
    pub animation: AnimationSettings,
    pub surface: SurfaceSettings,
    pub deploy: DeploySettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/wallpaint/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("wallpaint").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.planner.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.planner.base_url.clone()));
        }
        if self.planner.timeout_ms == Some(0) {
            return Err(out_of_range("planner.timeout_ms", 0));
        }

        let step = self.animation.step_delay_ms;
        if !(step.is_finite() && step >= 0.0) {
            return Err(out_of_range("animation.step_delay_ms", step));
        }
        let stroke = self.animation.min_stroke_px;
        if !(stroke.is_finite() && stroke > 0.0) {
            return Err(out_of_range("animation.min_stroke_px", stroke));
        }

        if self.surface.width_px == 0 {
            return Err(out_of_range("surface.width_px", 0));
        }
        if self.surface.height_px == 0 {
            return Err(out_of_range("surface.height_px", 0));
        }

        let tool = self.deploy.tool_width;
        if !(tool.is_finite() && tool >= 0.0) {
            return Err(out_of_range("deploy.tool_width", tool));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.planner.base_url, "http://127.0.0.1:8000/api/v1");
        assert_eq!(config.planner.timeout_ms, None);
        assert_eq!(config.animation.step_delay_ms, 0.5);
        assert_eq!(config.deploy.missing_input_policy, MissingInputPolicy::Ignore);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::new();
        config.surface.width_px = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange {
                key: "surface.width_px".to_string(),
                value: "0".to_string()
            })
        );

        let mut config = Config::new();
        config.planner.base_url = "ftp://planner".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        let mut config = Config::new();
        config.planner.timeout_ms = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.animation.step_delay_ms = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.deploy.tool_width = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [planner]
            timeout_ms = 2500

            [deploy]
            missing_input_policy = "report"
            "#,
        )
        .unwrap();
        assert_eq!(config.planner.timeout_ms, Some(2500));
        assert_eq!(config.planner.base_url, DEFAULT_PLANNER_BASE_URL);
        assert_eq!(config.deploy.missing_input_policy, MissingInputPolicy::Report);
        assert_eq!(config.surface, SurfaceSettings::default());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = Config::new()
            .save_to_file(Path::new("config.yaml"))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::UnsupportedFormat(ref ext)) if ext == "yaml"
        ));
    }
}
