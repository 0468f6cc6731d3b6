//! Shared constants for rendering and animation defaults.

/// Minimum painted stroke width in pixels, regardless of scale.
pub const MIN_STROKE_PX: f64 = 1.5;

/// Default delay between animation steps in milliseconds (smaller is faster).
pub const DEFAULT_STEP_DELAY_MS: f64 = 0.5;

/// Default rendering surface width in pixels.
pub const DEFAULT_SURFACE_WIDTH_PX: u32 = 800;

/// Default rendering surface height in pixels.
pub const DEFAULT_SURFACE_HEIGHT_PX: u32 = 600;

/// Outline width used for obstacle rectangles, in pixels.
pub const OBSTACLE_OUTLINE_PX: f64 = 2.0;

/// Default planner endpoint.
pub const DEFAULT_PLANNER_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

/// Tool width used when none is supplied, in meters.
pub const DEFAULT_TOOL_WIDTH_M: f64 = 0.1;

/// Aspect mismatch above which a uniform-scale warning is logged.
pub const DISTORTION_WARN_RATIO: f64 = 0.01;
