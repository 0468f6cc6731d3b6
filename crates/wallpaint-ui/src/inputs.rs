//! Deploy inputs
//!
//! A deploy reads the wall size, one obstacle, and the tool width from an
//! [`InputSource`]. [`FormInputs`] holds them as raw text the way a form
//! does and parses them on read.

use parking_lot::Mutex;
use wallpaint_core::{Dimensions, InputError, Obstacle, Point, TrajectoryRequest};
use wallpaint_settings::DeploySettings;

/// Parsed inputs for one deploy
#[derive(Debug, Clone, PartialEq)]
pub struct DeployInputs {
    pub request: TrajectoryRequest,
    /// Tool width in meters
    pub tool_width: f64,
}

impl DeployInputs {
    pub fn new(request: TrajectoryRequest, tool_width: f64) -> Self {
        Self {
            request,
            tool_width,
        }
    }

    /// Inputs matching the configured defaults
    pub fn from_settings(settings: &DeploySettings) -> Self {
        let obstacle = &settings.obstacle;
        Self::new(
            TrajectoryRequest::new(
                Dimensions::new(settings.wall_width, settings.wall_height),
                vec![Obstacle::new(
                    Point::new(obstacle.x, obstacle.y),
                    Dimensions::new(obstacle.width, obstacle.height),
                )],
            ),
            settings.tool_width,
        )
    }
}

/// Supplies the current inputs each time a deploy starts
pub trait InputSource: Send + Sync {
    fn read(&self) -> Result<DeployInputs, InputError>;
}

impl InputSource for DeployInputs {
    fn read(&self) -> Result<DeployInputs, InputError> {
        Ok(self.clone())
    }
}

impl<T: InputSource + Send> InputSource for Mutex<T> {
    fn read(&self) -> Result<DeployInputs, InputError> {
        self.lock().read()
    }
}

/// Raw text of the deploy form; `None` is an absent field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub wall_width: Option<String>,
    pub wall_height: Option<String>,
    pub obstacle_x: Option<String>,
    pub obstacle_y: Option<String>,
    pub obstacle_width: Option<String>,
    pub obstacle_height: Option<String>,
    pub tool_width: Option<String>,
}

impl FormInputs {
    /// Form pre-filled with the configured defaults
    pub fn from_settings(settings: &DeploySettings) -> Self {
        let text = |value: f64| Some(value.to_string());
        Self {
            wall_width: text(settings.wall_width),
            wall_height: text(settings.wall_height),
            obstacle_x: text(settings.obstacle.x),
            obstacle_y: text(settings.obstacle.y),
            obstacle_width: text(settings.obstacle.width),
            obstacle_height: text(settings.obstacle.height),
            tool_width: text(settings.tool_width),
        }
    }

    pub fn parse(&self) -> Result<DeployInputs, InputError> {
        let wall = Dimensions::new(
            parse_field("wall width", &self.wall_width)?,
            parse_field("wall height", &self.wall_height)?,
        );
        let obstacle = Obstacle::new(
            Point::new(
                parse_field("obstacle x", &self.obstacle_x)?,
                parse_field("obstacle y", &self.obstacle_y)?,
            ),
            Dimensions::new(
                parse_field("obstacle width", &self.obstacle_width)?,
                parse_field("obstacle height", &self.obstacle_height)?,
            ),
        );
        let tool_width = parse_field("tool width", &self.tool_width)?;

        Ok(DeployInputs::new(
            TrajectoryRequest::new(wall, vec![obstacle]),
            tool_width,
        ))
    }
}

impl InputSource for FormInputs {
    fn read(&self) -> Result<DeployInputs, InputError> {
        self.parse()
    }
}

fn parse_field(field: &str, raw: &Option<String>) -> Result<f64, InputError> {
    let text = raw.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(InputError::Missing {
            field: field.to_string(),
        });
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::Invalid {
            field: field.to_string(),
            value: text.to_string(),
        }),
    }
}
