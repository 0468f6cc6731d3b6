//! Trajectory planning service

pub mod http;

use async_trait::async_trait;
use wallpaint_core::{ServiceError, Trajectory, TrajectoryRequest};

pub use http::{error_detail, HttpPlannerClient};

/// Computes painting trajectories for a wall.
#[async_trait]
pub trait PlannerService: Send + Sync {
    /// Plan a trajectory covering the wall around the given obstacles
    async fn plan(
        &self,
        request: &TrajectoryRequest,
        tool_width: f64,
    ) -> Result<Trajectory, ServiceError>;

    /// Fetch a previously planned trajectory by its id
    async fn fetch_trajectory(&self, id: i64) -> Result<Trajectory, ServiceError>;
}
