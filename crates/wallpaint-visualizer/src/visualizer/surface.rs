//! Rendering surface abstraction
//!
//! The animator and the obstacle renderer only ever talk to a
//! [`RenderSurface`]. [`RecordingSurface`] keeps a display list instead of
//! pixels; [`crate::visualizer::raster::RasterSurface`] rasterizes.

use super::viewport::PixelRect;
use glam::DVec2;

/// Straight (non-premultiplied) RGBA color, alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

/// Paint stroke color for the robot path
pub const PAINT_STROKE_COLOR: Color = Color::rgba(0, 170, 255, 0.9);
/// Obstacle fill color
pub const OBSTACLE_FILL_COLOR: Color = Color::rgba(220, 53, 69, 0.9);
/// Obstacle outline color (#ff6b81)
pub const OBSTACLE_OUTLINE_COLOR: Color = Color::rgb(0xff, 0x6b, 0x81);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// How a line segment is stroked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeStyle {
    /// Round-capped, round-joined stroke so consecutive segments read as one
    pub fn paint(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// Fixed-size raster target
///
/// Implementations must report a constant size for their whole lifetime.
pub trait RenderSurface: Send {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Erase everything drawn so far
    fn clear(&mut self);

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: PixelRect, color: Color);

    /// Outline a rectangle
    fn stroke_rect(&mut self, rect: PixelRect, color: Color, width: f64);

    /// Stroke a single line segment
    fn stroke_line(&mut self, from: DVec2, to: DVec2, style: &StrokeStyle);
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: PixelRect,
        color: Color,
    },
    StrokeRect {
        rect: PixelRect,
        color: Color,
        width: f64,
    },
    Line {
        from: DVec2,
        to: DVec2,
        style: StrokeStyle,
    },
}

/// Surface that records draw calls as a display list
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            clears: 0,
        }
    }

    /// Everything drawn since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Line segments drawn since the last clear, in draw order
    pub fn lines(&self) -> Vec<(DVec2, DVec2)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    /// Number of times the surface was cleared
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color, width: f64) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, style: &StrokeStyle) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            style: *style,
        });
    }
}
