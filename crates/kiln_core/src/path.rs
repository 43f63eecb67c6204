//! Vector paths
//!
//! A `Path` is an ordered list of move/line/curve/close commands. Besides
//! building and transforming paths this module answers point containment
//! with the non-zero winding rule through lyon's hit test.

use std::f32::consts::{FRAC_PI_2, TAU};

use lyon::algorithms::hit_test::hit_test_path;
use lyon::path::{FillRule, PathEvent};

use crate::geometry::{Affine2D, Point, Rect};

/// Curve flattening tolerance for containment, in path units
const HIT_TOLERANCE: f32 = 0.01;

/// Path command for building vector paths
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Move to a point
    MoveTo(Point),
    /// Line to a point
    LineTo(Point),
    /// Quadratic Bézier curve
    QuadTo { control: Point, end: Point },
    /// Cubic Bézier curve
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Close the current subpath
    Close,
}

impl PathCommand {
    /// Map every point of the command through a transform
    pub fn transformed(&self, m: &Affine2D) -> PathCommand {
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(m.transform_point(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(m.transform_point(p)),
            PathCommand::QuadTo { control, end } => PathCommand::QuadTo {
                control: m.transform_point(control),
                end: m.transform_point(end),
            },
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => PathCommand::CubicTo {
                control1: m.transform_point(control1),
                control2: m.transform_point(control2),
                end: m.transform_point(end),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// A vector path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create a new empty path
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Create a path from a vector of commands
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Append a command in place
    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Move to a point
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    /// Line to a point
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    /// Quadratic Bézier curve
    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self
    }

    /// Cubic Bézier curve
    pub fn cubic_to(mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::CubicTo {
            control1: Point::new(cx1, cy1),
            control2: Point::new(cx2, cy2),
            end: Point::new(x, y),
        });
        self
    }

    /// Close the path
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Circular arc, joined to the current point with a line if there is one
    pub fn arc(
        mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    ) -> Self {
        let (start, curves) = arc_segments(center, radius, start_angle, end_angle, anticlockwise);
        if self.commands.is_empty() {
            self.commands.push(PathCommand::MoveTo(start));
        } else {
            self.commands.push(PathCommand::LineTo(start));
        }
        self.commands.extend(curves);
        self
    }

    /// Create a rectangle path
    pub fn rect(rect: Rect) -> Self {
        Self::new()
            .move_to(rect.x(), rect.y())
            .line_to(rect.max_x(), rect.y())
            .line_to(rect.max_x(), rect.max_y())
            .line_to(rect.x(), rect.max_y())
            .close()
    }

    /// Create a circle path
    pub fn circle(center: Point, radius: f32) -> Self {
        Self::new().arc(center, radius, 0.0, TAU, false).close()
    }

    /// Get the path commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Map every point through a transform
    pub fn transform(&self, m: &Affine2D) -> Path {
        Path {
            commands: self.commands.iter().map(|c| c.transformed(m)).collect(),
        }
    }

    /// Calculate the control-point bounding rectangle of this path
    pub fn bounds(&self) -> Rect {
        let mut points = self.commands.iter().flat_map(|cmd| match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::QuadTo { control, end } => vec![control, end],
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => vec![control1, control2, end],
            PathCommand::Close => Vec::new(),
        });

        let Some(first) = points.next() else {
            return Rect::ZERO;
        };
        points.fold(Rect::new(first.x, first.y, 0.0, 0.0), |r, p| {
            r.expand_to_include(p)
        })
    }

    /// Non-zero winding containment test
    ///
    /// Every subpath is treated as implicitly closed, as a fill would.
    pub fn contains(&self, point: Point) -> bool {
        if !point.is_finite() {
            return false;
        }
        hit_test_path(
            &to_lyon(point),
            self.lyon_events(),
            FillRule::NonZero,
            HIT_TOLERANCE,
        )
    }

    /// Path as lyon events, one `Begin`/`End` pair per subpath
    ///
    /// Drawing after a close (or before any move) starts a new subpath at
    /// the last subpath start, the origin if there is none.
    pub fn lyon_events(&self) -> Vec<PathEvent> {
        let mut events = Vec::with_capacity(self.commands.len() + 2);
        let mut first = Point::ZERO;
        let mut current = Point::ZERO;
        let mut open = false;

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    if open {
                        events.push(end_event(current, first, false));
                    }
                    events.push(PathEvent::Begin { at: to_lyon(p) });
                    first = p;
                    current = p;
                    open = true;
                }
                PathCommand::Close => {
                    if open {
                        events.push(end_event(current, first, true));
                        open = false;
                    }
                    current = first;
                }
                segment => {
                    if !open {
                        events.push(PathEvent::Begin { at: to_lyon(first) });
                        current = first;
                        open = true;
                    }
                    let from = to_lyon(current);
                    match segment {
                        PathCommand::LineTo(p) => {
                            events.push(PathEvent::Line { from, to: to_lyon(p) });
                            current = p;
                        }
                        PathCommand::QuadTo { control, end } => {
                            events.push(PathEvent::Quadratic {
                                from,
                                ctrl: to_lyon(control),
                                to: to_lyon(end),
                            });
                            current = end;
                        }
                        PathCommand::CubicTo {
                            control1,
                            control2,
                            end,
                        } => {
                            events.push(PathEvent::Cubic {
                                from,
                                ctrl1: to_lyon(control1),
                                ctrl2: to_lyon(control2),
                                to: to_lyon(end),
                            });
                            current = end;
                        }
                        PathCommand::MoveTo(_) | PathCommand::Close => {}
                    }
                }
            }
        }
        if open {
            events.push(end_event(current, first, false));
        }
        events
    }
}

fn to_lyon(p: Point) -> lyon::math::Point {
    lyon::math::point(p.x, p.y)
}

fn end_event(last: Point, first: Point, close: bool) -> PathEvent {
    PathEvent::End {
        last: to_lyon(last),
        first: to_lyon(first),
        close,
    }
}

/// Cubic approximation of a circular arc
///
/// Returns the arc's start point and the curves that trace it. Sweep
/// normalisation follows the HTML canvas rules: a clockwise sweep of a full
/// turn or more draws the whole circle, otherwise the sweep is reduced
/// modulo one turn in the drawing direction.
pub fn arc_segments(
    center: Point,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
    anticlockwise: bool,
) -> (Point, Vec<PathCommand>) {
    let radius = radius.abs();
    let sweep = if !anticlockwise {
        let delta = end_angle - start_angle;
        if delta >= TAU {
            TAU
        } else {
            delta.rem_euclid(TAU)
        }
    } else {
        let delta = start_angle - end_angle;
        if delta >= TAU {
            -TAU
        } else {
            -delta.rem_euclid(TAU)
        }
    };

    let at = |angle: f32| {
        Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    };

    let start = at(start_angle);
    // tolerance keeps exact quarter turns from rounding up to an extra segment
    let count = (sweep.abs() / FRAC_PI_2 - 1e-4).ceil().max(1.0) as usize;
    let step = sweep / count as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut curves = Vec::with_capacity(count);
    if sweep == 0.0 {
        return (start, curves);
    }

    let mut a0 = start_angle;
    for _ in 0..count {
        let a1 = a0 + step;
        let p0 = at(a0);
        let p3 = at(a1);
        let control1 = Point::new(p0.x - k * radius * a0.sin(), p0.y + k * radius * a0.cos());
        let control2 = Point::new(p3.x + k * radius * a1.sin(), p3.y - k * radius * a1.cos());
        curves.push(PathCommand::CubicTo {
            control1,
            control2,
            end: p3,
        });
        a0 = a1;
    }
    (start, curves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_builder() {
        let path = Path::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 0.0)
            .line_to(100.0, 100.0)
            .line_to(0.0, 100.0)
            .close();

        assert_eq!(path.commands().len(), 5);
    }

    #[test]
    fn test_rect_contains() {
        let path = Path::rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(path.contains(Point::new(50.0, 50.0)));
        assert!(!path.contains(Point::new(150.0, 150.0)));
        assert!(!path.contains(Point::new(-1.0, 50.0)));
    }

    #[test]
    fn test_open_subpath_is_implicitly_closed() {
        let triangle = Path::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 0.0)
            .line_to(0.0, 100.0);
        assert!(triangle.contains(Point::new(10.0, 10.0)));
        assert!(!triangle.contains(Point::new(90.0, 90.0)));
    }

    #[test]
    fn test_circle_contains() {
        let circle = Path::circle(Point::new(50.0, 50.0), 25.0);
        assert!(circle.contains(Point::new(50.0, 50.0)));
        assert!(circle.contains(Point::new(70.0, 50.0)));
        assert!(!circle.contains(Point::new(70.0, 70.0)));
    }

    #[test]
    fn test_nonzero_rule_keeps_overlap_filled() {
        let mut path = Path::rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        for cmd in Path::rect(Rect::new(25.0, 25.0, 50.0, 50.0)).commands() {
            path.push(*cmd);
        }
        // Same winding direction twice: still inside under non-zero
        assert!(path.contains(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_reverse_winding_cuts_hole() {
        let path = Path::rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let hole = Path::new()
            .move_to(25.0, 25.0)
            .line_to(25.0, 75.0)
            .line_to(75.0, 75.0)
            .line_to(75.0, 25.0)
            .close();
        let mut combined = path;
        for cmd in hole.commands() {
            combined.push(*cmd);
        }
        assert!(!combined.contains(Point::new(50.0, 50.0)));
        assert!(combined.contains(Point::new(10.0, 50.0)));
    }

    #[test]
    fn test_transform_moves_containment() {
        let path = Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0))
            .transform(&Affine2D::translation(100.0, 100.0));
        assert!(path.contains(Point::new(105.0, 105.0)));
        assert!(!path.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_quad_curve_contains() {
        // bulges up to y = 50 at x = 50
        let path = Path::new()
            .move_to(0.0, 0.0)
            .quad_to(50.0, 100.0, 100.0, 0.0)
            .close();
        assert!(path.contains(Point::new(50.0, 40.0)));
        assert!(!path.contains(Point::new(50.0, 60.0)));
        assert!(!path.contains(Point::new(5.0, 40.0)));
    }

    #[test]
    fn test_drawing_after_close_reopens_at_start() {
        let path = Path::new()
            .move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .close()
            .line_to(-10.0, 0.0)
            .line_to(-10.0, -10.0);

        let events = path.lyon_events();
        let begins = events
            .iter()
            .filter(|e| matches!(e, PathEvent::Begin { .. }))
            .count();
        assert_eq!(begins, 2);
        assert!(path.contains(Point::new(8.0, 2.0)));
        assert!(path.contains(Point::new(-8.0, -2.0)));
    }

    #[test]
    fn test_empty_and_non_finite() {
        assert!(Path::new().lyon_events().is_empty());
        assert!(!Path::new().contains(Point::ZERO));
        let rect = Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!rect.contains(Point::new(f32::NAN, 5.0)));
    }

    #[test]
    fn test_arc_full_turn_clockwise() {
        let (start, curves) = arc_segments(Point::ZERO, 10.0, 0.0, TAU, false);
        assert_eq!(start, Point::new(10.0, 0.0));
        assert_eq!(curves.len(), 4);
    }

    #[test]
    fn test_arc_anticlockwise_quarter() {
        let (_, curves) = arc_segments(Point::ZERO, 10.0, 0.0, FRAC_PI_2, true);
        // 270 degrees the other way round
        assert_eq!(curves.len(), 3);
    }

    #[test]
    fn test_bounds() {
        let path = Path::new().move_to(-5.0, 2.0).line_to(10.0, 20.0);
        assert_eq!(path.bounds(), Rect::new(-5.0, 2.0, 15.0, 18.0));
        assert_eq!(Path::new().bounds(), Rect::ZERO);
    }
}
