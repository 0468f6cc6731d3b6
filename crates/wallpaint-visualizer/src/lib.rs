//! # Wallpaint Visualizer
//!
//! Renders a wall, its obstacles, and the robot's planned path onto a
//! fixed-size surface, animating the path as a growing paint stroke.

pub mod visualizer;

pub use visualizer::{
    render_obstacles, AnimationObserver, AnimationSession, AnimatorConfig, Color, DrawCommand,
    LineCap, LineJoin, NoopObserver, PathAnimator, PixelRect, RasterError, RasterSurface,
    RecordingSurface, RenderSurface, StepOutcome, StrokeStyle, SurfaceTransform,
    OBSTACLE_FILL_COLOR, OBSTACLE_OUTLINE_COLOR, PAINT_STROKE_COLOR,
};
