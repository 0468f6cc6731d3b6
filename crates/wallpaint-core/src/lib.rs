//! # Wallpaint Core
//!
//! Core types, errors, and events for Wallpaint.
//! Provides the wall/trajectory data model shared by the planner client,
//! the visualizer, and the status/orchestration layer.

pub mod constants;
pub mod core;
pub mod data;
pub mod error;
pub mod types;

pub use core::event::{AnimationEvent, EventDispatcher};

pub use data::{
    format_position, Dimensions, Obstacle, Point, SessionId, Trajectory, TrajectoryRequest,
};

pub use error::{AnimationError, Error, InputError, Result, ServiceError, StatusError};

pub use types::{thread_safe, ThreadSafe};
