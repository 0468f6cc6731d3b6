//! Data models for walls, obstacles, and planned trajectories
//!
//! This module provides:
//! - World-space points and dimensions (meters, origin at the wall's bottom-left)
//! - Obstacle rectangles anchored at their bottom-left corner
//! - The planner request payload and the planned trajectory it returns
//! - Animation session identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// World-space coordinate in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal distance from the wall's left edge
    pub x: f64,
    /// Vertical distance from the wall's bottom edge
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {:.2}m, Y: {:.2}m", self.x, self.y)
    }
}

/// Format a reported position the way the status line shows it.
pub fn format_position(point: &Point) -> String {
    point.to_string()
}

/// Width and height in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Create new dimensions
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned obstacle rectangle on the wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bottom_left: Point,
    pub dimensions: Dimensions,
}

impl Obstacle {
    /// Create an obstacle from its bottom-left corner and size
    pub const fn new(bottom_left: Point, dimensions: Dimensions) -> Self {
        Self {
            bottom_left,
            dimensions,
        }
    }

    /// World-space top edge
    pub fn top(&self) -> f64 {
        self.bottom_left.y + self.dimensions.height
    }

    /// World-space right edge
    pub fn right(&self) -> f64 {
        self.bottom_left.x + self.dimensions.width
    }
}

/// Payload sent to the planning service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRequest {
    pub wall_dimensions: Dimensions,
    pub obstacles: Vec<Obstacle>,
}

impl TrajectoryRequest {
    /// Create a request for a wall with the given obstacles
    pub fn new(wall_dimensions: Dimensions, obstacles: Vec<Obstacle>) -> Self {
        Self {
            wall_dimensions,
            obstacles,
        }
    }
}

/// Planned trajectory returned by the planning service
///
/// `path` is ordered: segment `i` runs from `path[i - 1]` to `path[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Identifier assigned by the planner when it stored the trajectory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub wall_dimensions: Dimensions,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub path: Vec<Point>,
}

impl Trajectory {
    /// Create a trajectory without a planner-assigned id
    pub fn new(wall_dimensions: Dimensions, obstacles: Vec<Obstacle>, path: Vec<Point>) -> Self {
        Self {
            id: None,
            wall_dimensions,
            obstacles,
            path,
        }
    }

    /// Number of drawable segments (zero for paths shorter than two points)
    pub fn segment_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Last waypoint, if any
    pub fn final_point(&self) -> Option<Point> {
        self.path.last().copied()
    }
}

/// Identity of one animation session
///
/// Ids grow monotonically; `SessionId::NONE` never names a real session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    /// Sentinel meaning "no active session"
    pub const NONE: SessionId = SessionId(0);

    /// True for the sentinel value
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}
