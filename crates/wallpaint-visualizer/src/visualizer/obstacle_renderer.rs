//! Static obstacle layer
//! Clears the surface and draws every obstacle of a trajectory as a filled,
//! outlined rectangle.

use super::surface::{RenderSurface, OBSTACLE_FILL_COLOR, OBSTACLE_OUTLINE_COLOR};
use super::viewport::SurfaceTransform;
use tracing::debug;
use wallpaint_core::constants::OBSTACLE_OUTLINE_PX;
use wallpaint_core::Trajectory;

/// Render the obstacle layer for `trajectory`, replacing whatever the surface
/// showed before. Returns the number of obstacles drawn.
pub fn render_obstacles<S: RenderSurface + ?Sized>(
    surface: &mut S,
    trajectory: &Trajectory,
) -> usize {
    surface.clear();

    let (width, height) = surface.size();
    let transform = SurfaceTransform::new(trajectory.wall_dimensions.width, width, height);

    for obstacle in &trajectory.obstacles {
        let rect = transform.rect_to_surface(obstacle.bottom_left, obstacle.dimensions);
        surface.fill_rect(rect, OBSTACLE_FILL_COLOR);
        surface.stroke_rect(rect, OBSTACLE_OUTLINE_COLOR, OBSTACLE_OUTLINE_PX);
    }

    debug!(
        "Rendered {} obstacles at {:.2} px/m",
        trajectory.obstacles.len(),
        transform.scale()
    );
    trajectory.obstacles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::raster::RasterSurface;
    use crate::visualizer::surface::{DrawCommand, RecordingSurface};
    use crate::visualizer::viewport::PixelRect;
    use wallpaint_core::{Dimensions, Obstacle, Point};

    fn wall_with_obstacle() -> Trajectory {
        Trajectory::new(
            Dimensions::new(4.0, 3.0),
            vec![Obstacle::new(Point::new(1.0, 1.0), Dimensions::new(1.0, 1.0))],
            vec![],
        )
    }

    #[test]
    fn test_obstacle_rect_geometry() {
        let mut surface = RecordingSurface::new(400, 300);
        let drawn = render_obstacles(&mut surface, &wall_with_obstacle());
        assert_eq!(drawn, 1);

        let expected = PixelRect::new(100.0, 100.0, 100.0, 100.0);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::FillRect {
                    rect: expected,
                    color: OBSTACLE_FILL_COLOR
                },
                DrawCommand::StrokeRect {
                    rect: expected,
                    color: OBSTACLE_OUTLINE_COLOR,
                    width: OBSTACLE_OUTLINE_PX
                },
            ]
        );
    }

    #[test]
    fn test_render_clears_previous_content() {
        let mut surface = RecordingSurface::new(400, 300);
        surface.fill_rect(PixelRect::new(0.0, 0.0, 5.0, 5.0), OBSTACLE_FILL_COLOR);
        let empty = Trajectory::new(Dimensions::new(4.0, 3.0), vec![], vec![]);
        render_obstacles(&mut surface, &empty);
        assert!(surface.commands().is_empty());
        assert_eq!(surface.clear_count(), 1);
    }

    #[test]
    fn test_render_is_idempotent_on_pixels() {
        let trajectory = wall_with_obstacle();

        let mut once = RasterSurface::new(400, 300).unwrap();
        render_obstacles(&mut once, &trajectory);

        let mut twice = RasterSurface::new(400, 300).unwrap();
        render_obstacles(&mut twice, &trajectory);
        render_obstacles(&mut twice, &trajectory);

        assert_eq!(once.data(), twice.data());
    }
}
