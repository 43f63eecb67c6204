//! Ready-made geometry callbacks
//!
//! Each constructor returns a [`DrawFn`] that traces its outline in local
//! coordinates and paints it through the shape's style. Closed outlines are
//! filled then stroked; a polyline is only stroked.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use kiln_core::Point;
use kiln_paint::SurfaceExt;

use crate::context::{DrawFn, ShapeContext};

/// Rectangle from the origin to `(width, height)`
pub fn rect(width: f32, height: f32) -> DrawFn {
    Arc::new(move |ctx: &mut ShapeContext<'_>| {
        ctx.begin_path();
        ctx.rect(0.0, 0.0, width, height);
        ctx.fill_stroke();
        Ok(())
    })
}

/// Circle around the origin
pub fn circle(radius: f32) -> DrawFn {
    Arc::new(move |ctx: &mut ShapeContext<'_>| {
        ctx.begin_path();
        ctx.arc(0.0, 0.0, radius, 0.0, TAU, false);
        ctx.close_path();
        ctx.fill_stroke();
        Ok(())
    })
}

/// Ellipse around the origin
///
/// The unit circle is traced under a scale; the scale is gone again before
/// painting so the stroke keeps a uniform width.
pub fn ellipse(radius_x: f32, radius_y: f32) -> DrawFn {
    Arc::new(move |ctx: &mut ShapeContext<'_>| {
        ctx.begin_path();
        {
            let mut s = ctx.saved();
            s.scale(radius_x, radius_y);
            s.arc(0.0, 0.0, 1.0, 0.0, TAU, false);
            s.close_path();
        }
        ctx.fill_stroke();
        Ok(())
    })
}

/// Regular polygon around the origin with its first vertex straight up
///
/// Fewer than three sides traces nothing.
pub fn regular_polygon(sides: u32, radius: f32) -> DrawFn {
    let points = if sides < 3 {
        Vec::new()
    } else {
        (0..sides)
            .map(|i| {
                let angle = i as f32 * TAU / sides as f32 - FRAC_PI_2;
                Point::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    };
    polygon(points)
}

/// Closed outline through `points`
pub fn polygon(points: Vec<Point>) -> DrawFn {
    Arc::new(move |ctx: &mut ShapeContext<'_>| {
        if trace(ctx, &points) {
            ctx.close_path();
            ctx.fill_stroke();
        }
        Ok(())
    })
}

/// Open line through `points`
pub fn polyline(points: Vec<Point>) -> DrawFn {
    Arc::new(move |ctx: &mut ShapeContext<'_>| {
        if trace(ctx, &points) {
            ctx.stroke();
        }
        Ok(())
    })
}

fn trace(ctx: &mut ShapeContext<'_>, points: &[Point]) -> bool {
    let Some((first, rest)) = points.split_first() else {
        return false;
    };
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ShapeStyle;
    use kiln_core::Color;
    use kiln_paint::{RecordingSurface, Surface};

    fn run(draw: &DrawFn, style: &ShapeStyle) -> RecordingSurface {
        let mut surface = RecordingSurface::new(100, 100);
        draw(&mut ShapeContext::new(&mut surface, style)).unwrap();
        surface
    }

    fn styled() -> ShapeStyle {
        ShapeStyle::new()
            .with_fill(Color::RED)
            .with_stroke(Color::BLACK)
    }

    #[test]
    fn test_rect_contains_interior() {
        let surface = run(&rect(10.0, 20.0), &styled());
        assert!(surface.is_point_in_path(5.0, 15.0));
        assert!(!surface.is_point_in_path(11.0, 5.0));
        assert_eq!(surface.fills().count(), 1);
        assert_eq!(surface.strokes().count(), 1);
    }

    #[test]
    fn test_circle() {
        let surface = run(&circle(10.0), &styled());
        assert!(surface.is_point_in_path(0.0, 0.0));
        assert!(surface.is_point_in_path(6.0, 6.0));
        assert!(!surface.is_point_in_path(8.0, 8.0));
    }

    #[test]
    fn test_ellipse_restores_scale() {
        let surface = run(&ellipse(20.0, 5.0), &styled());
        assert!(surface.is_point_in_path(15.0, 0.0));
        assert!(!surface.is_point_in_path(0.0, 8.0));

        let stroke = surface.strokes().next().unwrap();
        assert!(stroke.state.transform.is_identity());
    }

    #[test]
    fn test_regular_polygon_first_vertex_up() {
        let surface = run(&regular_polygon(4, 10.0), &styled());
        assert!(surface.is_point_in_path(0.0, -9.0));
        assert!(!surface.is_point_in_path(8.0, 8.0));
    }

    #[test]
    fn test_degenerate_polygon_draws_nothing() {
        let surface = run(&regular_polygon(2, 10.0), &styled());
        assert_eq!(surface.fills().count(), 0);
        assert_eq!(surface.strokes().count(), 0);
    }

    #[test]
    fn test_polyline_only_strokes() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let surface = run(&polyline(points), &styled());
        assert_eq!(surface.fills().count(), 0);
        assert_eq!(surface.strokes().count(), 1);
    }
}
