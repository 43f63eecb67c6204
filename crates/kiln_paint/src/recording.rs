//! Recording surface
//!
//! A `RecordingSurface` paints no pixels. It logs every call as a
//! [`SurfaceOp`] while keeping full canvas state, so tests and tools can
//! inspect exactly what a shape drew and with which state. Point-in-path
//! queries work against the recorded path.

use kiln_core::{Affine2D, Color, Image, LineJoin, Paint, Path, Point, Rect, Vec2};

use crate::error::Result;
use crate::state::{CanvasState, DrawingState};
use crate::surface::Surface;

/// Snapshot taken when `fill` or `stroke` is called
#[derive(Clone, Debug, PartialEq)]
pub struct PaintCall {
    /// Drawing state in effect for the operation
    pub state: DrawingState,
    /// Path painted, in surface space
    pub path: Path,
}

/// A recorded surface call
///
/// Path arguments are recorded in user space, as passed.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Save,
    Restore,
    Transform(Affine2D),
    SetTransform(Affine2D),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    QuadTo {
        control: Point,
        end: Point,
    },
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    },
    Rect(Rect),
    ClosePath,
    SetFillPaint(Paint),
    SetStrokePaint(Paint),
    SetLineWidth(f32),
    SetLineJoin(LineJoin),
    SetGlobalAlpha(f32),
    SetShadowColor(Color),
    SetShadowBlur(f32),
    SetShadowOffset(Vec2),
    Fill(PaintCall),
    Stroke(PaintCall),
}

impl SurfaceOp {
    /// Short operation name, handy for asserting call order
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceOp::Save => "save",
            SurfaceOp::Restore => "restore",
            SurfaceOp::Transform(_) => "transform",
            SurfaceOp::SetTransform(_) => "set_transform",
            SurfaceOp::BeginPath => "begin_path",
            SurfaceOp::MoveTo(_) => "move_to",
            SurfaceOp::LineTo(_) => "line_to",
            SurfaceOp::QuadTo { .. } => "quad_to",
            SurfaceOp::CubicTo { .. } => "cubic_to",
            SurfaceOp::Arc { .. } => "arc",
            SurfaceOp::Rect(_) => "rect",
            SurfaceOp::ClosePath => "close_path",
            SurfaceOp::SetFillPaint(_) => "set_fill_paint",
            SurfaceOp::SetStrokePaint(_) => "set_stroke_paint",
            SurfaceOp::SetLineWidth(_) => "set_line_width",
            SurfaceOp::SetLineJoin(_) => "set_line_join",
            SurfaceOp::SetGlobalAlpha(_) => "set_global_alpha",
            SurfaceOp::SetShadowColor(_) => "set_shadow_color",
            SurfaceOp::SetShadowBlur(_) => "set_shadow_blur",
            SurfaceOp::SetShadowOffset(_) => "set_shadow_offset",
            SurfaceOp::Fill(_) => "fill",
            SurfaceOp::Stroke(_) => "stroke",
        }
    }
}

/// A surface that records calls instead of rasterizing
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    canvas: CanvasState,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Create a new recording surface with a nominal size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            canvas: CanvasState::new(),
            ops: Vec::new(),
        }
    }

    /// Get the recorded operations
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Take the recorded operations
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Names of the recorded operations, in order
    pub fn op_names(&self) -> Vec<&'static str> {
        self.ops.iter().map(SurfaceOp::name).collect()
    }

    /// Every recorded fill
    pub fn fills(&self) -> impl Iterator<Item = &PaintCall> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Fill(call) => Some(call),
            _ => None,
        })
    }

    /// Every recorded stroke
    pub fn strokes(&self) -> impl Iterator<Item = &PaintCall> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Stroke(call) => Some(call),
            _ => None,
        })
    }

    fn paint_call(&self) -> PaintCall {
        PaintCall {
            state: self.canvas.state().clone(),
            path: self.canvas.path().clone(),
        }
    }
}

impl Surface for RecordingSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn drawing_state(&self) -> &DrawingState {
        self.canvas.state()
    }

    fn save_depth(&self) -> usize {
        self.canvas.depth()
    }

    fn save(&mut self) {
        self.ops.push(SurfaceOp::Save);
        self.canvas.save();
    }

    fn restore(&mut self) {
        self.ops.push(SurfaceOp::Restore);
        self.canvas.restore();
    }

    fn transform(&mut self, m: &Affine2D) {
        self.ops.push(SurfaceOp::Transform(*m));
        self.canvas.transform(m);
    }

    fn set_transform(&mut self, m: Affine2D) {
        self.ops.push(SurfaceOp::SetTransform(m));
        self.canvas.set_transform(m);
    }

    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
        self.canvas.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(SurfaceOp::MoveTo(Point::new(x, y)));
        self.canvas.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(SurfaceOp::LineTo(Point::new(x, y)));
        self.canvas.line_to(x, y);
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.ops.push(SurfaceOp::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self.canvas.quad_to(cx, cy, x, y);
    }

    fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.ops.push(SurfaceOp::CubicTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            end: Point::new(x, y),
        });
        self.canvas.cubic_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn arc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    ) {
        self.ops.push(SurfaceOp::Arc {
            center: Point::new(x, y),
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        });
        self.canvas
            .arc(x, y, radius, start_angle, end_angle, anticlockwise);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops
            .push(SurfaceOp::Rect(Rect::new(x, y, width, height)));
        self.canvas.rect(x, y, width, height);
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
        self.canvas.close_path();
    }

    fn set_fill_paint(&mut self, paint: Paint) {
        self.ops.push(SurfaceOp::SetFillPaint(paint.clone()));
        self.canvas.set_fill_paint(paint);
    }

    fn set_stroke_paint(&mut self, paint: Paint) {
        self.ops.push(SurfaceOp::SetStrokePaint(paint.clone()));
        self.canvas.set_stroke_paint(paint);
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(SurfaceOp::SetLineWidth(width));
        self.canvas.set_line_width(width);
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ops.push(SurfaceOp::SetLineJoin(join));
        self.canvas.set_line_join(join);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ops.push(SurfaceOp::SetGlobalAlpha(alpha));
        self.canvas.set_global_alpha(alpha);
    }

    fn set_shadow_color(&mut self, color: Color) {
        self.ops.push(SurfaceOp::SetShadowColor(color));
        self.canvas.set_shadow_color(color);
    }

    fn set_shadow_blur(&mut self, blur: f32) {
        self.ops.push(SurfaceOp::SetShadowBlur(blur));
        self.canvas.set_shadow_blur(blur);
    }

    fn set_shadow_offset(&mut self, offset: Vec2) {
        self.ops.push(SurfaceOp::SetShadowOffset(offset));
        self.canvas.set_shadow_offset(offset);
    }

    fn fill(&mut self) {
        let call = self.paint_call();
        self.ops.push(SurfaceOp::Fill(call));
    }

    fn stroke(&mut self) {
        let call = self.paint_call();
        self.ops.push(SurfaceOp::Stroke(call));
    }

    fn is_point_in_path(&self, x: f32, y: f32) -> bool {
        self.canvas.is_point_in_path(x, y)
    }

    /// Discards the operation log and resets canvas state
    fn clear(&mut self) {
        self.ops.clear();
        self.canvas.reset();
    }

    /// Always transparent: nothing is rasterized
    fn read_pixels(&self) -> Result<Image> {
        Ok(Image::transparent(self.width, self.height)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceExt;

    #[test]
    fn test_records_in_order() {
        let mut s = RecordingSurface::new(100, 100);
        s.save();
        s.translate(5.0, 5.0);
        s.begin_path();
        s.rect(0.0, 0.0, 10.0, 10.0);
        s.fill();
        s.restore();

        assert_eq!(
            s.op_names(),
            vec!["save", "transform", "begin_path", "rect", "fill", "restore"]
        );
    }

    #[test]
    fn test_fill_snapshots_state() {
        let mut s = RecordingSurface::new(100, 100);
        s.set_fill_paint(Color::RED.into());
        s.set_global_alpha(0.25);
        s.rect(0.0, 0.0, 10.0, 10.0);
        s.fill();
        s.set_fill_paint(Color::BLUE.into());

        let fill = s.fills().next().unwrap();
        assert_eq!(fill.state.fill, Paint::Solid(Color::RED));
        assert_eq!(fill.state.global_alpha, 0.25);
        assert!(fill.path.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_saved_guard_restores() {
        let mut s = RecordingSurface::new(10, 10);
        {
            let mut guard = s.saved();
            guard.set_line_width(8.0);
            assert_eq!(guard.save_depth(), 1);
        }
        assert_eq!(s.save_depth(), 0);
        assert_eq!(s.drawing_state().line_width, 1.0);
        assert_eq!(s.ops().last(), Some(&SurfaceOp::Restore));
    }

    #[test]
    fn test_dyn_surface() {
        let mut s = RecordingSurface::new(10, 10);
        let surface: &mut dyn Surface = &mut s;
        surface.begin_path();
        surface.arc(5.0, 5.0, 3.0, 0.0, std::f32::consts::TAU, false);
        surface.stroke();

        assert_eq!(s.strokes().count(), 1);
        assert!(s.is_point_in_path(5.0, 5.0));
    }

    #[test]
    fn test_clear_discards_log() {
        let mut s = RecordingSurface::new(10, 10);
        s.save();
        s.rect(0.0, 0.0, 5.0, 5.0);
        s.clear();

        assert!(s.ops().is_empty());
        assert_eq!(s.save_depth(), 0);
        assert!(!s.is_point_in_path(2.0, 2.0));
    }

    #[test]
    fn test_read_pixels_is_transparent() {
        let s = RecordingSurface::new(4, 3);
        let img = s.read_pixels().unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.opaque_pixel_count(), 0);
    }
}
