//! 2D wall visualization
//!
//! This module provides:
//! - World-to-surface coordinate transform (viewport)
//! - Surface abstraction with display-list and raster backends
//! - Obstacle layer rendering
//! - Session-based path stroke animation

pub mod animator;
pub mod obstacle_renderer;
pub mod raster;
pub mod surface;
pub mod viewport;

pub use animator::{
    AnimationObserver, AnimationSession, AnimatorConfig, NoopObserver, PathAnimator, StepOutcome,
};
pub use obstacle_renderer::render_obstacles;
pub use raster::{RasterError, RasterSurface};
pub use surface::{
    Color, DrawCommand, LineCap, LineJoin, RecordingSurface, RenderSurface, StrokeStyle,
    OBSTACLE_FILL_COLOR, OBSTACLE_OUTLINE_COLOR, PAINT_STROKE_COLOR,
};
pub use viewport::{PixelRect, SurfaceTransform};
