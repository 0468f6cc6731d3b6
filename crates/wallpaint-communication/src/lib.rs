//! # Wallpaint Communication
//!
//! Client side of the trajectory planning service. The [`PlannerService`]
//! trait is what the deploy workflow talks to; [`HttpPlannerClient`] is the
//! reqwest implementation of the service's HTTP API.

pub mod planner;

pub use planner::{error_detail, HttpPlannerClient, PlannerService};
