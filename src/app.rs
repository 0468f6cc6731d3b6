//! Wiring for the command-line front end
//!
//! Builds a [`DeployController`] from a [`Config`] over a raster surface and
//! the log-backed status view, and waits for a started animation to finish.

use anyhow::{bail, Context};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};
use wallpaint_communication::{HttpPlannerClient, PlannerService};
use wallpaint_core::{
    thread_safe, AnimationEvent, Dimensions, Obstacle, Point, ServiceError, ThreadSafe,
};
use wallpaint_settings::{AnimationSettings, Config, PlannerSettings};
use wallpaint_ui::{
    DeployController, DeployOutcome, InputSource, StatusView, TracingStatusView, UiState,
};
use wallpaint_visualizer::{AnimatorConfig, Color, RasterSurface, RenderSurface};

/// Controller used by the binary
pub type CliController = DeployController<RasterSurface, TracingStatusView>;

const BACKGROUND: Color = Color::rgb(255, 255, 255);

pub fn animator_config(settings: &AnimationSettings) -> AnimatorConfig {
    AnimatorConfig {
        min_stroke_px: settings.min_stroke_px,
        ..AnimatorConfig::with_step_delay_ms(settings.step_delay_ms)
    }
}

pub fn planner_client(settings: &PlannerSettings) -> Result<HttpPlannerClient, ServiceError> {
    Ok(HttpPlannerClient::new(&settings.base_url)?
        .with_timeout(settings.timeout_ms.map(Duration::from_millis)))
}

/// Controller drawing onto a fresh raster surface sized from `config`
pub fn build_controller(
    config: &Config,
    planner: Arc<dyn PlannerService>,
    inputs: Arc<dyn InputSource>,
) -> anyhow::Result<(CliController, ThreadSafe<RasterSurface>)> {
    let surface = RasterSurface::new(config.surface.width_px, config.surface.height_px)
        .context("Cannot create drawing surface")?
        .with_background(BACKGROUND);
    let surface = thread_safe(surface);

    let controller = DeployController::new(
        planner,
        inputs,
        Arc::clone(&surface),
        TracingStatusView,
        animator_config(&config.animation),
    )
    .with_missing_input_policy(config.deploy.missing_input_policy);

    Ok((controller, surface))
}

/// Wait for the session in `outcome` to stop, then return the final state.
///
/// `events` must have been subscribed before the deploy started.
pub async fn wait_until_settled<S: RenderSurface + 'static, V: StatusView + 'static>(
    controller: &DeployController<S, V>,
    events: &mut broadcast::Receiver<AnimationEvent>,
    outcome: &DeployOutcome,
) -> anyhow::Result<UiState> {
    if let DeployOutcome::Painting(session) = outcome {
        loop {
            match events.recv().await {
                Ok(event) if event.session() == *session && event.is_terminal() => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Missed {} animation events", skipped);
                }
                Err(RecvError::Closed) => bail!("Animation event stream closed"),
            }
        }
    }
    Ok(controller.state())
}

/// Write the surface to `path` as PNG
pub fn export_surface(surface: &ThreadSafe<RasterSurface>, path: &Path) -> anyhow::Result<()> {
    surface
        .lock()
        .save_png(path)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Parse an obstacle given as `x,y,width,height` in meters
pub fn parse_obstacle(text: &str) -> Result<Obstacle, String> {
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid obstacle '{text}': {e}"))?;

    match values.as_slice() {
        [x, y, width, height] => Ok(Obstacle::new(
            Point::new(*x, *y),
            Dimensions::new(*width, *height),
        )),
        _ => Err(format!(
            "invalid obstacle '{text}': expected x,y,width,height"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_obstacle() {
        assert_eq!(
            parse_obstacle("1, 1.5,0.5,2").unwrap(),
            Obstacle::new(Point::new(1.0, 1.5), Dimensions::new(0.5, 2.0))
        );
        assert!(parse_obstacle("1,2,3").is_err());
        assert!(parse_obstacle("1,2,three,4").is_err());
    }

    #[test]
    fn test_animator_config_from_settings() {
        let settings = AnimationSettings {
            step_delay_ms: 20.0,
            min_stroke_px: 3.0,
        };
        let config = animator_config(&settings);
        assert_eq!(config.step_delay, Duration::from_millis(20));
        assert_eq!(config.min_stroke_px, 3.0);
    }

    #[test]
    fn test_planner_client_from_settings() {
        let settings = PlannerSettings {
            base_url: "http://localhost:9000/api/v1".to_string(),
            timeout_ms: Some(250),
        };
        let client = planner_client(&settings).unwrap();
        assert_eq!(client.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(client.base_url().as_str(), "http://localhost:9000/api/v1/");
    }
}
