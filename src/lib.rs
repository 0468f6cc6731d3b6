//! # Wallpaint
//!
//! Visualizer for a wall-painting robot: sends the wall and its obstacles to
//! a trajectory planning service, draws the obstacles, and animates the
//! returned path as a growing paint stroke.
//!
//! ## Architecture
//!
//! 1. **wallpaint-core** - Data model, errors, animation events
//! 2. **wallpaint-communication** - Planning service client
//! 3. **wallpaint-visualizer** - Coordinate mapping, surfaces, obstacle layer, path animator
//! 4. **wallpaint-settings** - Configuration files
//! 5. **wallpaint-ui** - Status state machine and deploy workflow
//! 6. **wallpaint** - Command-line binary that wires them together

pub mod app;

pub use app::{
    animator_config, build_controller, export_surface, parse_obstacle, planner_client,
    wait_until_settled, CliController,
};

pub use wallpaint_core::{
    AnimationEvent, Dimensions, Error, EventDispatcher, Obstacle, Point, Result, SessionId,
    Trajectory, TrajectoryRequest,
};

pub use wallpaint_communication::{HttpPlannerClient, PlannerService};

pub use wallpaint_visualizer::{
    AnimatorConfig, PathAnimator, RasterSurface, RecordingSurface, RenderSurface, SurfaceTransform,
};

pub use wallpaint_settings::{Config, MissingInputPolicy};

pub use wallpaint_ui::{
    DeployController, DeployInputs, DeployOutcome, FormInputs, StatusMachine, TracingStatusView,
    UiState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging on stderr with:
/// - RUST_LOG environment variable support (INFO by default)
/// - Pretty console formatting, or one JSON object per line when `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(false);
        registry.with(fmt_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
