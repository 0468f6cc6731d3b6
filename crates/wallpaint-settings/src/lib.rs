//! Wallpaint Settings Crate
//!
//! Handles application configuration: planner endpoint, animation tuning,
//! surface size, and deploy defaults.

pub mod config;
pub mod error;

pub use config::{
    AnimationSettings, Config, DeploySettings, MissingInputPolicy, ObstacleSettings,
    PlannerSettings, SurfaceSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
