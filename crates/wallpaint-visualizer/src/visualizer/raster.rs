//! Raster surface backed by a tiny-skia pixmap
//! Draws anti-aliased strokes and rectangles and exports the result as PNG.

use super::surface::{Color, LineCap, LineJoin, RenderSurface, StrokeStyle};
use super::viewport::PixelRect;
use glam::DVec2;
use image::RgbaImage;
use std::path::Path;
use thiserror::Error;
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// Errors from creating or exporting a raster surface
#[derive(Error, Debug)]
pub enum RasterError {
    /// Width or height is zero
    #[error("Cannot allocate a {width}x{height} surface")]
    EmptySurface { width: u32, height: u32 },

    /// Pixel buffer did not match the surface size
    #[error("Pixel buffer size mismatch")]
    BufferMismatch,

    /// PNG encoding or file write failed
    #[error("Image export failed: {0}")]
    Export(#[from] image::ImageError),
}

fn to_skia(color: Color) -> tiny_skia::Color {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, alpha)
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia(color));
    paint.anti_alias = true;
    paint
}

fn skia_rect(rect: PixelRect) -> Option<Rect> {
    Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

/// Pixel surface for rendering walls, obstacles, and paint strokes
pub struct RasterSurface {
    pixmap: Pixmap,
    background: Option<Color>,
}

impl RasterSurface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::EmptySurface { width, height })?;
        Ok(Self {
            pixmap,
            background: None,
        })
    }

    /// Use an opaque background instead of transparency when clearing
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self.clear();
        self
    }

    /// Straight-alpha color of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some([px.red(), px.green(), px.blue(), px.alpha()])
    }

    /// Raw premultiplied RGBA bytes
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Convert to a straight-alpha RGBA image
    pub fn to_image(&self) -> Result<RgbaImage, RasterError> {
        let mut buf = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            buf.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), buf)
            .ok_or(RasterError::BufferMismatch)
    }

    /// Write the surface to a PNG (format chosen by extension)
    pub fn save_png(&self, path: &Path) -> Result<(), RasterError> {
        self.to_image()?.save(path)?;
        tracing::info!("Saved surface to {}", path.display());
        Ok(())
    }
}

impl RenderSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self) {
        match self.background {
            Some(bg) => self.pixmap.fill(to_skia(bg)),
            None => self.pixmap.fill(tiny_skia::Color::TRANSPARENT),
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        if let Some(r) = skia_rect(rect) {
            self.pixmap
                .fill_rect(r, &paint_for(color), Transform::identity(), None);
        }
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color, width: f64) {
        let Some(r) = skia_rect(rect) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        let stroke = Stroke {
            width: width as f32,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint_for(color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, style: &StrokeStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: style.width as f32,
            line_cap: match style.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match style.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint_for(style.color),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::surface::{OBSTACLE_FILL_COLOR, PAINT_STROKE_COLOR};

    #[test]
    fn test_zero_size_surface_rejected() {
        assert!(matches!(
            RasterSurface::new(0, 10),
            Err(RasterError::EmptySurface { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_fill_rect_colors_inside_only() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        surface.fill_rect(PixelRect::new(5.0, 5.0, 10.0, 10.0), OBSTACLE_FILL_COLOR);
        let inside = surface.pixel(10, 10).unwrap();
        assert!((218..=222).contains(&inside[0]));
        assert!(inside[3] > 200);
        assert_eq!(surface.pixel(1, 1).unwrap()[3], 0);
    }

    #[test]
    fn test_stroke_line_covers_segment() {
        let mut surface = RasterSurface::new(50, 50).unwrap();
        surface.stroke_line(
            DVec2::new(5.0, 25.0),
            DVec2::new(45.0, 25.0),
            &StrokeStyle::paint(PAINT_STROKE_COLOR, 4.0),
        );
        assert!(surface.pixel(25, 25).unwrap()[3] > 0);
        assert_eq!(surface.pixel(25, 5).unwrap()[3], 0);
    }

    #[test]
    fn test_clear_restores_background() {
        let mut surface = RasterSurface::new(8, 8)
            .unwrap()
            .with_background(Color::rgb(10, 20, 30));
        surface.fill_rect(PixelRect::new(0.0, 0.0, 8.0, 8.0), OBSTACLE_FILL_COLOR);
        surface.clear();
        assert_eq!(surface.pixel(3, 3).unwrap(), [10, 20, 30, 255]);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.png");
        let surface = RasterSurface::new(16, 12).unwrap();
        surface.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 16);
        assert_eq!(loaded.height(), 12);
    }
}
