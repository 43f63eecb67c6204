//! CPU raster surface backed by tiny-skia
//!
//! `RasterSurface` owns an RGBA pixmap and paints the canvas state's current
//! path into it. The path is kept in surface space, so fills draw it with an
//! identity transform while strokes map it back into user space first so
//! line width and joins scale with the transform. Gradient and pattern
//! shaders are positioned with the transform that was current at paint time.

use kiln_core::{
    Affine2D, Color, Gradient, Image, LineJoin, Paint, Path, PathCommand, Point, Rect, RepeatMode,
    Vec2,
};
use tiny_skia::{FillRule, Mask, Pixmap, Shader, SpreadMode, Transform};

use crate::error::{Result, SurfaceError};
use crate::shadow::draw_shadow;
use crate::state::{CanvasState, DrawingState};
use crate::surface::Surface;

/// Largest width or height a raster surface accepts
pub const MAX_DIMENSION: u32 = 32767;

/// Miter limit used for every stroke
const MITER_LIMIT: f32 = 10.0;

/// Pixel surface with canvas drawing semantics
#[derive(Clone, Debug)]
pub struct RasterSurface {
    pixmap: Pixmap,
    canvas: CanvasState,
    anti_alias: bool,
}

impl RasterSurface {
    /// Transparent surface of the given size
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(SurfaceError::InvalidDimensions { width, height })?;
        Ok(Self {
            pixmap,
            canvas: CanvasState::new(),
            anti_alias: true,
        })
    }

    /// Enable or disable anti-aliased edges (on by default)
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    /// Premultiplied RGBA pixels as stored by tiny-skia
    pub fn premultiplied_data(&self) -> &[u8] {
        self.pixmap.data()
    }
}

impl Surface for RasterSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn drawing_state(&self) -> &DrawingState {
        self.canvas.state()
    }

    fn save_depth(&self) -> usize {
        self.canvas.depth()
    }

    fn save(&mut self) {
        self.canvas.save();
    }

    fn restore(&mut self) {
        self.canvas.restore();
    }

    fn transform(&mut self, m: &Affine2D) {
        self.canvas.transform(m);
    }

    fn set_transform(&mut self, m: Affine2D) {
        self.canvas.set_transform(m);
    }

    fn begin_path(&mut self) {
        self.canvas.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.canvas.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.canvas.line_to(x, y);
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.canvas.quad_to(cx, cy, x, y);
    }

    fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
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
        self.canvas
            .arc(x, y, radius, start_angle, end_angle, anticlockwise);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.canvas.rect(x, y, width, height);
    }

    fn close_path(&mut self) {
        self.canvas.close_path();
    }

    fn set_fill_paint(&mut self, paint: Paint) {
        self.canvas.set_fill_paint(paint);
    }

    fn set_stroke_paint(&mut self, paint: Paint) {
        self.canvas.set_stroke_paint(paint);
    }

    fn set_line_width(&mut self, width: f32) {
        self.canvas.set_line_width(width);
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.canvas.set_line_join(join);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.canvas.set_global_alpha(alpha);
    }

    fn set_shadow_color(&mut self, color: Color) {
        self.canvas.set_shadow_color(color);
    }

    fn set_shadow_blur(&mut self, blur: f32) {
        self.canvas.set_shadow_blur(blur);
    }

    fn set_shadow_offset(&mut self, offset: Vec2) {
        self.canvas.set_shadow_offset(offset);
    }

    fn fill(&mut self) {
        let Some(path) = to_skia_path(self.canvas.path()) else {
            return;
        };
        let state = self.canvas.state();
        let source = pattern_source(&state.fill);
        let Some(prepared) = prepare_paint(
            &state.fill,
            source.as_ref(),
            state,
            (self.pixmap.width(), self.pixmap.height()),
            self.anti_alias,
        ) else {
            return;
        };

        if state.shadow.is_visible() {
            draw_shadow(
                &mut self.pixmap,
                &path,
                Transform::identity(),
                &state.shadow,
                state.global_alpha,
                self.anti_alias,
            );
        }

        self.pixmap.fill_path(
            &path,
            &prepared.paint,
            FillRule::Winding,
            Transform::identity(),
            prepared.clip.as_ref(),
        );
    }

    fn stroke(&mut self) {
        let state = self.canvas.state();
        let Some(inverse) = state.transform.invert() else {
            tracing::trace!("stroke skipped: transform is not invertible");
            return;
        };
        let Some(path) = to_skia_path(&self.canvas.path().transform(&inverse)) else {
            return;
        };
        let source = pattern_source(&state.stroke);
        let Some(prepared) = prepare_paint(
            &state.stroke,
            source.as_ref(),
            state,
            (self.pixmap.width(), self.pixmap.height()),
            self.anti_alias,
        ) else {
            return;
        };

        let stroke = tiny_skia::Stroke {
            width: state.line_width,
            line_join: skia_line_join(state.line_join),
            miter_limit: MITER_LIMIT,
            ..Default::default()
        };
        let ts = skia_transform(&state.transform);

        if state.shadow.is_visible() {
            let res_scale = state.transform.approx_scale().max(f32::EPSILON);
            if let Some(outline) = path.stroke(&stroke, res_scale) {
                draw_shadow(
                    &mut self.pixmap,
                    &outline,
                    ts,
                    &state.shadow,
                    state.global_alpha,
                    self.anti_alias,
                );
            }
        }

        self.pixmap
            .stroke_path(&path, &prepared.paint, &stroke, ts, prepared.clip.as_ref());
    }

    fn is_point_in_path(&self, x: f32, y: f32) -> bool {
        self.canvas.is_point_in_path(x, y)
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.canvas.reset();
    }

    fn read_pixels(&self) -> Result<Image> {
        let (width, height) = self.dimensions();
        let data = unpremultiply_alpha(self.pixmap.data());
        Ok(Image::from_rgba(width, height, data)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Paint Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// tiny-skia paint plus the mask that limits non-repeating patterns
struct PreparedPaint<'a> {
    paint: tiny_skia::Paint<'a>,
    clip: Option<Mask>,
}

fn prepare_paint<'a>(
    paint: &Paint,
    source: Option<&'a Pixmap>,
    state: &DrawingState,
    (width, height): (u32, u32),
    anti_alias: bool,
) -> Option<PreparedPaint<'a>> {
    let alpha = state.global_alpha;
    let ts = skia_transform(&state.transform);

    let mut skia = tiny_skia::Paint {
        anti_alias,
        ..Default::default()
    };
    let mut clip = None;

    match paint {
        Paint::Solid(color) => {
            if color.is_transparent() {
                return None;
            }
            skia.set_color(skia_color(*color, alpha));
        }
        Paint::Gradient(gradient) => {
            skia.shader = gradient_shader(gradient, alpha, ts)?;
        }
        Paint::Pattern(pattern) => {
            let pixmap = source?;
            skia.shader = tiny_skia::Pattern::new(
                pixmap.as_ref(),
                SpreadMode::Repeat,
                tiny_skia::FilterQuality::Nearest,
                alpha,
                ts,
            );
            if pattern.repeat != RepeatMode::Repeat {
                let (w, h) = pattern.image.dimensions();
                clip = Some(pattern_clip(
                    pattern.repeat,
                    w as f32,
                    h as f32,
                    &state.transform,
                    (width, height),
                )?);
            }
        }
    }

    Some(PreparedPaint { paint: skia, clip })
}

fn gradient_shader(gradient: &Gradient, alpha: f32, ts: Transform) -> Option<Shader<'static>> {
    let stops = gradient.stops();
    if stops.is_empty() {
        return None;
    }

    match gradient {
        Gradient::Linear { start, end, .. } => {
            let stops = stops
                .iter()
                .map(|s| tiny_skia::GradientStop::new(s.offset, skia_color(s.color, alpha)))
                .collect();
            tiny_skia::LinearGradient::new(
                skia_point(*start),
                skia_point(*end),
                stops,
                SpreadMode::Pad,
                ts,
            )
        }
        Gradient::Radial {
            start,
            start_radius,
            end,
            end_radius,
            ..
        } => {
            let (r0, r1) = (start_radius.max(0.0), end_radius.max(0.0));
            if (r1 - r0).abs() <= f32::EPSILON {
                return None;
            }

            if start == end {
                // Concentric circles: a plain radial gradient out to the larger
                // radius, with stops remapped onto the ring between the two.
                let outer = r0.max(r1);
                let mut mapped: Vec<tiny_skia::GradientStop> = stops
                    .iter()
                    .map(|s| {
                        let distance = r0 + s.offset * (r1 - r0);
                        tiny_skia::GradientStop::new(distance / outer, skia_color(s.color, alpha))
                    })
                    .collect();
                if r1 < r0 {
                    mapped.reverse();
                }
                tiny_skia::RadialGradient::new(
                    skia_point(*end),
                    skia_point(*end),
                    outer,
                    mapped,
                    SpreadMode::Pad,
                    ts,
                )
            } else {
                // Distinct centers: focal point at the start, outer circle at the end.
                let stops = stops
                    .iter()
                    .map(|s| tiny_skia::GradientStop::new(s.offset, skia_color(s.color, alpha)))
                    .collect();
                tiny_skia::RadialGradient::new(
                    skia_point(*start),
                    skia_point(*end),
                    r1,
                    stops,
                    SpreadMode::Pad,
                    ts,
                )
            }
        }
    }
}

/// Premultiplied pixmap of a pattern image
fn pattern_source(paint: &Paint) -> Option<Pixmap> {
    let Paint::Pattern(pattern) = paint else {
        return None;
    };
    let (w, h) = pattern.image.dimensions();
    let size = tiny_skia::IntSize::from_wh(w, h)?;
    Pixmap::from_vec(premultiply_alpha(pattern.image.data()), size)
}

/// Mask covering the tiles a non-repeating axis allows
fn pattern_clip(
    repeat: RepeatMode,
    tile_w: f32,
    tile_h: f32,
    transform: &Affine2D,
    (width, height): (u32, u32),
) -> Option<Mask> {
    let inverse = transform.invert()?;
    let (sw, sh) = (width as f32, height as f32);
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(sw, 0.0),
        Point::new(0.0, sh),
        Point::new(sw, sh),
    ];
    let mut extent = Rect::from_points(
        inverse.transform_point(corners[0]),
        inverse.transform_point(corners[3]),
    );
    for corner in &corners[1..3] {
        extent = extent.expand_to_include(inverse.transform_point(*corner));
    }

    let (left, right) = if repeat.repeats_x() {
        (extent.x(), extent.max_x())
    } else {
        (0.0, tile_w)
    };
    let (top, bottom) = if repeat.repeats_y() {
        (extent.y(), extent.max_y())
    } else {
        (0.0, tile_h)
    };

    let rect = tiny_skia::Rect::from_ltrb(left, top, right, bottom)?;
    let mut mask = Mask::new(width, height)?;
    mask.fill_path(
        &tiny_skia::PathBuilder::from_rect(rect),
        FillRule::Winding,
        false,
        skia_transform(transform),
    );
    Some(mask)
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for cmd in path.commands() {
        match *cmd {
            PathCommand::MoveTo(p) => pb.move_to(p.x, p.y),
            PathCommand::LineTo(p) => pb.line_to(p.x, p.y),
            PathCommand::QuadTo { control, end } => {
                pb.quad_to(control.x, control.y, end.x, end.y)
            }
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => pb.cubic_to(
                control1.x, control1.y, control2.x, control2.y, end.x, end.y,
            ),
            PathCommand::Close => pb.close(),
        }
    }
    pb.finish()
}

fn skia_transform(m: &Affine2D) -> Transform {
    let [a, b, c, d, tx, ty] = m.elements;
    Transform::from_row(a, b, c, d, tx, ty)
}

fn skia_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x, p.y)
}

fn skia_color(color: Color, global_alpha: f32) -> tiny_skia::Color {
    let [r, g, b, a] = color.with_alpha(color.a * global_alpha).to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn skia_line_join(join: LineJoin) -> tiny_skia::LineJoin {
    match join {
        LineJoin::Miter => tiny_skia::LineJoin::Miter,
        LineJoin::Round => tiny_skia::LineJoin::Round,
        LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
    }
}

fn premultiply_alpha(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as u32;
        let mul = |c: u8| ((c as u32 * a + 127) / 255) as u8;
        result.extend_from_slice(&[mul(chunk[0]), mul(chunk[1]), mul(chunk[2]), chunk[3]]);
    }
    result
}

fn unpremultiply_alpha(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as f32 / 255.0;
        if a > 0.0 {
            let r = ((chunk[0] as f32 / a).min(255.0)) as u8;
            let g = ((chunk[1] as f32 / a).min(255.0)) as u8;
            let b = ((chunk[2] as f32 / a).min(255.0)) as u8;
            result.extend_from_slice(&[r, g, b, chunk[3]]);
        } else {
            result.extend_from_slice(&[0, 0, 0, 0]);
        }
    }
    result
}
