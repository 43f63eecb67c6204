//! Canvas State Machine
//!
//! `CanvasState` is the part of a drawing surface that is independent of how
//! pixels are produced: the current drawing state, the save/restore stack
//! and the path under construction. Both [`RecordingSurface`] and
//! [`RasterSurface`] embed one and delegate to it, so their state semantics
//! are identical.
//!
//! Path points are mapped through the current transform as they are added,
//! so the stored path is in surface space. Changing the transform after
//! building a path does not move it, and the path is not part of the saved
//! state.
//!
//! [`RecordingSurface`]: crate::RecordingSurface
//! [`RasterSurface`]: crate::RasterSurface

use kiln_core::{
    arc_segments, Affine2D, Color, LineJoin, Paint, Path, PathCommand, Point, Shadow, Vec2,
};

// ─────────────────────────────────────────────────────────────────────────────
// Drawing State
// ─────────────────────────────────────────────────────────────────────────────

/// Everything `save` captures and `restore` brings back
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingState {
    pub fill: Paint,
    pub stroke: Paint,
    pub line_width: f32,
    pub line_join: LineJoin,
    pub global_alpha: f32,
    pub shadow: Shadow,
    /// Current transformation matrix (user space to surface space)
    pub transform: Affine2D,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill: Paint::Solid(Color::BLACK),
            stroke: Paint::Solid(Color::BLACK),
            line_width: 1.0,
            line_join: LineJoin::Miter,
            global_alpha: 1.0,
            shadow: Shadow::default(),
            transform: Affine2D::IDENTITY,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Canvas State
// ─────────────────────────────────────────────────────────────────────────────

/// Drawing state, save stack and current path of a surface
#[derive(Clone, Debug, Default)]
pub struct CanvasState {
    state: DrawingState,
    stack: Vec<DrawingState>,
    path: Path,
    current_point: Option<Point>,
    subpath_start: Option<Point>,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// Number of saved states not yet restored
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Current path in surface space
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Back to the initial state with an empty stack and path
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pop the last saved state; unbalanced restores are ignored
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    /// Post-multiply the current transform
    pub fn transform(&mut self, m: &Affine2D) {
        self.state.transform = self.state.transform.then(m);
    }

    pub fn set_transform(&mut self, m: Affine2D) {
        self.state.transform = m;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Path Building
    // ─────────────────────────────────────────────────────────────────────────

    pub fn begin_path(&mut self) {
        self.path = Path::new();
        self.current_point = None;
        self.subpath_start = None;
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.push(PathCommand::MoveTo(p));
        self.current_point = Some(p);
        self.subpath_start = Some(p);
    }

    /// Line to (x, y); starts a subpath there when none is open
    pub fn line_to(&mut self, x: f32, y: f32) {
        if self.current_point.is_none() {
            self.move_to(x, y);
            return;
        }
        let p = self.map(x, y);
        self.path.push(PathCommand::LineTo(p));
        self.current_point = Some(p);
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        if self.current_point.is_none() {
            self.move_to(cx, cy);
        }
        let control = self.map(cx, cy);
        let end = self.map(x, y);
        self.path.push(PathCommand::QuadTo { control, end });
        self.current_point = Some(end);
    }

    pub fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        if self.current_point.is_none() {
            self.move_to(c1x, c1y);
        }
        let control1 = self.map(c1x, c1y);
        let control2 = self.map(c2x, c2y);
        let end = self.map(x, y);
        self.path.push(PathCommand::CubicTo {
            control1,
            control2,
            end,
        });
        self.current_point = Some(end);
    }

    /// Circular arc in user space, joined to the current point by a line
    pub fn arc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    ) {
        let (start, curves) = arc_segments(
            Point::new(x, y),
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        );
        if self.current_point.is_some() {
            self.line_to(start.x, start.y);
        } else {
            self.move_to(start.x, start.y);
        }

        let m = self.state.transform;
        for curve in curves {
            let mapped = curve.transformed(&m);
            if let PathCommand::CubicTo { end, .. } = mapped {
                self.current_point = Some(end);
            }
            self.path.push(mapped);
        }
    }

    /// Closed rectangle subpath
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }

    pub fn close_path(&mut self) {
        if self.current_point.is_none() {
            return;
        }
        self.path.push(PathCommand::Close);
        self.current_point = self.subpath_start;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Style Setters
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_fill_paint(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    pub fn set_stroke_paint(&mut self, paint: Paint) {
        self.state.stroke = paint;
    }

    /// Non-finite or non-positive widths are ignored
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    /// Values outside `0.0..=1.0` are ignored
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    pub fn set_shadow_color(&mut self, color: Color) {
        self.state.shadow.color = color;
    }

    /// Negative or non-finite blur levels are ignored
    pub fn set_shadow_blur(&mut self, blur: f32) {
        if blur.is_finite() && blur >= 0.0 {
            self.state.shadow.blur = blur;
        }
    }

    pub fn set_shadow_offset(&mut self, offset: Vec2) {
        if offset.x.is_finite() && offset.y.is_finite() {
            self.state.shadow.offset = offset;
        }
    }

    pub fn is_point_in_path(&self, x: f32, y: f32) -> bool {
        self.path.contains(Point::new(x, y))
    }

    fn map(&self, x: f32, y: f32) -> Point {
        self.state.transform.transform_point(Point::new(x, y))
    }
}
