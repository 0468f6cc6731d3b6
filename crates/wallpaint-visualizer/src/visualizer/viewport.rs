//! World-to-surface transform for wall rendering.
//!
//! World space is meters with the origin at the wall's bottom-left corner and
//! Y growing upwards. Surface space is pixels with the origin at the top-left
//! and Y growing downwards. A single scale derived from the wall width is used
//! for both axes.

use glam::DVec2;
use wallpaint_core::{Dimensions, Point};

/// Axis-aligned rectangle in surface pixels (origin = top-left corner)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Helper responsible for translating wall coordinates into surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTransform {
    scale: f64,
    surface_width: f64,
    surface_height: f64,
}

impl SurfaceTransform {
    /// Build the transform for a wall of `wall_width` meters drawn on a
    /// `surface_width` x `surface_height` pixel surface.
    ///
    /// `wall_width` is not validated here; callers that need a usable scale
    /// check it first.
    pub fn new(wall_width: f64, surface_width: u32, surface_height: u32) -> Self {
        let surface_width = f64::from(surface_width);
        Self {
            scale: surface_width / wall_width,
            surface_width,
            surface_height: f64::from(surface_height),
        }
    }

    /// Pixels per meter
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn surface_width(&self) -> f64 {
        self.surface_width
    }

    #[inline]
    pub fn surface_height(&self) -> f64 {
        self.surface_height
    }

    /// Map a world point to surface pixels, flipping Y.
    #[inline]
    pub fn to_surface(&self, point: Point) -> DVec2 {
        DVec2::new(
            point.x * self.scale,
            self.surface_height - point.y * self.scale,
        )
    }

    /// Convert a world length to pixels.
    #[inline]
    pub fn scale_length(&self, meters: f64) -> f64 {
        meters * self.scale
    }

    /// Surface rectangle for a bottom-left anchored world rectangle.
    ///
    /// The pixel origin is the rectangle's top-left corner, so the world
    /// height is subtracted after the flip.
    pub fn rect_to_surface(&self, bottom_left: Point, dimensions: Dimensions) -> PixelRect {
        let width = dimensions.width * self.scale;
        let height = dimensions.height * self.scale;
        PixelRect::new(
            bottom_left.x * self.scale,
            self.surface_height - bottom_left.y * self.scale - height,
            width,
            height,
        )
    }

    /// Relative mismatch between the wall's scaled height and the surface
    /// height. Zero when the aspect ratios agree.
    pub fn vertical_distortion(&self, wall_height: f64) -> f64 {
        if self.surface_height <= 0.0 {
            return 0.0;
        }
        ((wall_height * self.scale) - self.surface_height).abs() / self.surface_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_bottom_left() {
        let transform = SurfaceTransform::new(4.0, 400, 300);
        assert_eq!(transform.scale(), 100.0);
        assert_eq!(transform.to_surface(Point::new(0.0, 0.0)), DVec2::new(0.0, 300.0));
        assert_eq!(transform.to_surface(Point::new(4.0, 3.0)), DVec2::new(400.0, 0.0));
    }

    #[test]
    fn test_rect_origin_is_top_left() {
        let transform = SurfaceTransform::new(4.0, 400, 300);
        let rect = transform.rect_to_surface(Point::new(1.0, 1.0), Dimensions::new(1.0, 1.0));
        assert_eq!(rect, PixelRect::new(100.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn test_scale_uses_width_only() {
        // 4m x 1m wall on a 400x300 surface: the vertical axis is not stretched.
        let transform = SurfaceTransform::new(4.0, 400, 300);
        assert_eq!(transform.to_surface(Point::new(0.0, 1.0)).y, 200.0);
        assert!((transform.vertical_distortion(1.0) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(transform.vertical_distortion(3.0), 0.0);
    }

    #[test]
    fn test_scale_length() {
        let transform = SurfaceTransform::new(8.0, 800, 600);
        assert!((transform.scale_length(0.1) - 10.0).abs() < 1e-9);
    }
}
