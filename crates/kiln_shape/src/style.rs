//! Shape style attributes
//!
//! [`ShapeStyle`] is plain storage for what a shape paints with. Fills are
//! loosely specified: a bare color, or a [`FillDescriptor`] whose optional
//! fields decide between pattern, linear gradient and radial gradient.
//! [`Fill::classify`] turns either into exactly one [`ResolvedFill`].

use kiln_core::{Color, Gradient, Image, LineJoin, Paint, Pattern, Point, RepeatMode, Vec2};

/// Stroke width used when only a stroke color is set
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

/// Shadow blur used until one is set
pub const DEFAULT_SHADOW_BLUR: f32 = 5.0;

/// How a shape answers point-containment queries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetectionMode {
    /// Re-trace the outline and test the point against it
    #[default]
    Path,
    /// Look up the alpha of a cached pixel snapshot
    Pixel,
}

// ─────────────────────────────────────────────────────────────────────────────
// Fill Description
// ─────────────────────────────────────────────────────────────────────────────

/// One end of a gradient as specified on a shape
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GradientPoint {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub radius: Option<f32>,
    pub color: Option<Color>,
}

impl GradientPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Center point, when both coordinates are present and finite
    pub fn center(&self) -> Option<Point> {
        let point = Point::new(self.x?, self.y?);
        point.is_finite().then_some(point)
    }

    fn stop_color(&self) -> Color {
        self.color.unwrap_or(Color::BLACK)
    }
}

/// Fill attributes beyond a bare color
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FillDescriptor {
    pub image: Option<Image>,
    /// Pattern offset, applied as a translation before filling
    pub offset: Option<Vec2>,
    pub repeat: Option<RepeatMode>,
    pub start: Option<GradientPoint>,
    pub end: Option<GradientPoint>,
}

impl FillDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Some(Vec2::new(x, y));
        self
    }

    pub fn with_repeat(mut self, repeat: RepeatMode) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn with_start(mut self, start: GradientPoint) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: GradientPoint) -> Self {
        self.end = Some(end);
        self
    }
}

/// Fill attribute of a shape
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    Color(Color),
    Descriptor(FillDescriptor),
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Fill::Color(color)
    }
}

impl From<FillDescriptor> for Fill {
    fn from(descriptor: FillDescriptor) -> Self {
        Fill::Descriptor(descriptor)
    }
}

impl Fill {
    /// Repeating image pattern
    pub fn pattern(image: Image) -> Self {
        Fill::Descriptor(FillDescriptor::new().with_image(image))
    }

    /// Linear gradient from `start` to `end`
    pub fn linear(start: GradientPoint, end: GradientPoint) -> Self {
        Fill::Descriptor(FillDescriptor::new().with_start(start).with_end(end))
    }

    /// Radial gradient; both points need a radius
    pub fn radial(start: GradientPoint, end: GradientPoint) -> Self {
        Self::linear(start, end)
    }

    /// Pick the single paint this fill resolves to
    ///
    /// Rules, first match wins: bare color, image pattern, linear gradient
    /// (both ends positioned, no radii), radial gradient (both ends carry a
    /// radius, both circles centered on the start point), black fallback.
    pub fn classify(&self) -> ResolvedFill {
        let desc = match self {
            Fill::Color(color) => return ResolvedFill::Solid(*color),
            Fill::Descriptor(desc) => desc,
        };

        if let Some(image) = &desc.image {
            return ResolvedFill::Pattern {
                pattern: Pattern::new(image.clone(), desc.repeat.unwrap_or_default()),
                offset: desc.offset,
            };
        }

        let (Some(start), Some(end)) = (desc.start, desc.end) else {
            return ResolvedFill::Fallback;
        };

        if start.radius.is_none() && end.radius.is_none() {
            if let (Some(from), Some(to)) = (start.center(), end.center()) {
                return ResolvedFill::Linear(
                    Gradient::linear(from, to)
                        .with_stop(0.0, start.stop_color())
                        .with_stop(1.0, end.stop_color()),
                );
            }
        }

        if let (Some(r0), Some(r1)) = (start.radius, end.radius) {
            if let Some(center) = start.center() {
                return ResolvedFill::Radial(
                    Gradient::radial(center, r0, center, r1)
                        .with_stop(0.0, start.stop_color())
                        .with_stop(1.0, end.stop_color()),
                );
            }
        }

        ResolvedFill::Fallback
    }
}

/// Outcome of fill classification
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedFill {
    Solid(Color),
    Pattern {
        pattern: Pattern,
        offset: Option<Vec2>,
    },
    Linear(Gradient),
    Radial(Gradient),
    /// Unrecognised fill, painted black
    Fallback,
}

impl ResolvedFill {
    /// Surface paint for this fill
    pub fn paint(&self) -> Paint {
        match self {
            ResolvedFill::Solid(color) => Paint::Solid(*color),
            ResolvedFill::Pattern { pattern, .. } => Paint::Pattern(pattern.clone()),
            ResolvedFill::Linear(gradient) | ResolvedFill::Radial(gradient) => {
                Paint::Gradient(gradient.clone())
            }
            ResolvedFill::Fallback => Paint::Solid(Color::BLACK),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolvedFill::Fallback)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shape Style
// ─────────────────────────────────────────────────────────────────────────────

/// Style attributes of a shape
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    /// Fill paint; no fill when absent
    pub fill: Option<Fill>,
    /// Stroke color; black when only a width is set
    pub stroke: Option<Color>,
    /// Stroke width; [`DEFAULT_STROKE_WIDTH`] when only a color is set
    pub stroke_width: Option<f32>,
    pub line_join: LineJoin,
    /// Shadows are drawn only when a color is set
    pub shadow_color: Option<Color>,
    pub shadow_blur: f32,
    /// Shadow offset in surface pixels
    pub shadow_offset: Vec2,
    pub detection_mode: DetectionMode,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: None,
            line_join: LineJoin::Miter,
            shadow_color: None,
            shadow_blur: DEFAULT_SHADOW_BLUR,
            shadow_offset: Vec2::ZERO,
            detection_mode: DetectionMode::Path,
        }
    }
}

impl ShapeStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, fill: impl Into<Fill>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    pub fn with_shadow(mut self, color: Color, blur: f32, offset: Vec2) -> Self {
        self.shadow_color = Some(color);
        self.shadow_blur = blur;
        self.shadow_offset = offset;
        self
    }

    pub fn with_detection_mode(mut self, mode: DetectionMode) -> Self {
        self.detection_mode = mode;
        self
    }

    /// Whether a stroke pass draws anything
    pub fn has_stroke(&self) -> bool {
        self.stroke.is_some() || self.stroke_width.is_some()
    }

    /// Stroke color and width with defaults filled in, `None` without a stroke
    pub fn resolved_stroke(&self) -> Option<(Color, f32)> {
        if !self.has_stroke() {
            return None;
        }
        Some((
            self.stroke.unwrap_or(Color::BLACK),
            self.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::GradientStop;

    fn tile() -> Image {
        Image::solid(2, 2, Color::RED).unwrap()
    }

    #[test]
    fn test_bare_color_is_solid() {
        assert_eq!(
            Fill::from(Color::GREEN).classify(),
            ResolvedFill::Solid(Color::GREEN)
        );
    }

    #[test]
    fn test_image_wins_over_gradient_points() {
        let fill = Fill::Descriptor(
            FillDescriptor::new()
                .with_image(tile())
                .with_repeat(RepeatMode::RepeatX)
                .with_offset(3.0, 4.0)
                .with_start(GradientPoint::new(0.0, 0.0))
                .with_end(GradientPoint::new(10.0, 0.0)),
        );
        match fill.classify() {
            ResolvedFill::Pattern { pattern, offset } => {
                assert_eq!(pattern.repeat, RepeatMode::RepeatX);
                assert_eq!(offset, Some(Vec2::new(3.0, 4.0)));
            }
            other => panic!("expected pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_pattern_repeat_defaults_to_repeat() {
        match Fill::pattern(tile()).classify() {
            ResolvedFill::Pattern { pattern, offset } => {
                assert_eq!(pattern.repeat, RepeatMode::Repeat);
                assert_eq!(offset, None);
            }
            other => panic!("expected pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_linear_gradient_stops() {
        let fill = Fill::linear(
            GradientPoint::new(0.0, 0.0).with_color(Color::RED),
            GradientPoint::new(100.0, 0.0).with_color(Color::BLUE),
        );
        let ResolvedFill::Linear(gradient) = fill.classify() else {
            panic!("expected linear gradient");
        };
        assert_eq!(
            gradient.stops(),
            &[
                GradientStop::new(0.0, Color::RED),
                GradientStop::new(1.0, Color::BLUE)
            ]
        );
        assert!(matches!(
            gradient,
            Gradient::Linear { start, end, .. }
                if start == Point::new(0.0, 0.0) && end == Point::new(100.0, 0.0)
        ));
    }

    #[test]
    fn test_radial_gradient_centered_at_start() {
        let fill = Fill::radial(
            GradientPoint::new(20.0, 30.0).with_radius(0.0),
            GradientPoint::new(80.0, 90.0).with_radius(50.0),
        );
        let ResolvedFill::Radial(gradient) = fill.classify() else {
            panic!("expected radial gradient");
        };
        match gradient {
            Gradient::Radial {
                start,
                start_radius,
                end,
                end_radius,
                ..
            } => {
                assert_eq!(start, Point::new(20.0, 30.0));
                assert_eq!(end, Point::new(20.0, 30.0));
                assert_eq!(start_radius, 0.0);
                assert_eq!(end_radius, 50.0);
            }
            other => panic!("expected radial, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_stop_color_is_black() {
        let fill = Fill::linear(GradientPoint::new(0.0, 0.0), GradientPoint::new(1.0, 0.0));
        let ResolvedFill::Linear(gradient) = fill.classify() else {
            panic!("expected linear gradient");
        };
        assert!(gradient.stops().iter().all(|s| s.color == Color::BLACK));
    }

    #[test]
    fn test_malformed_fills_fall_back() {
        let only_start = Fill::Descriptor(
            FillDescriptor::new().with_start(GradientPoint::new(0.0, 0.0)),
        );
        let one_radius = Fill::radial(
            GradientPoint::new(0.0, 0.0).with_radius(5.0),
            GradientPoint::new(10.0, 0.0),
        );
        let non_finite = Fill::linear(
            GradientPoint::new(f32::NAN, 0.0),
            GradientPoint::new(10.0, 0.0),
        );
        let radial_without_center = Fill::radial(
            GradientPoint::default().with_radius(1.0),
            GradientPoint::default().with_radius(5.0),
        );
        let empty = Fill::Descriptor(FillDescriptor::new());

        for fill in [only_start, one_radius, non_finite, radial_without_center, empty] {
            let resolved = fill.classify();
            assert!(resolved.is_fallback(), "{fill:?} resolved to {resolved:?}");
            assert_eq!(resolved.paint(), Paint::Solid(Color::BLACK));
        }
    }

    #[test]
    fn test_classification_is_pure() {
        let cases = [
            ("solid", Fill::from(Color::GREEN)),
            ("pattern", Fill::pattern(tile())),
            (
                "linear",
                Fill::linear(GradientPoint::new(0.0, 0.0), GradientPoint::new(5.0, 5.0)),
            ),
            (
                "radial",
                Fill::radial(
                    GradientPoint::new(5.0, 5.0).with_radius(0.0),
                    GradientPoint::new(5.0, 5.0).with_radius(10.0),
                ),
            ),
            (
                "malformed",
                Fill::Descriptor(FillDescriptor::new().with_end(GradientPoint::new(1.0, 1.0))),
            ),
        ];

        for (name, fill) in &cases {
            let first = fill.classify();
            let second = fill.classify();
            assert_eq!(first, second, "{name} classified differently twice");

            let branch = match first {
                ResolvedFill::Solid(_) => "solid",
                ResolvedFill::Pattern { .. } => "pattern",
                ResolvedFill::Linear(_) => "linear",
                ResolvedFill::Radial(_) => "radial",
                ResolvedFill::Fallback => "malformed",
            };
            assert_eq!(branch, *name);
        }
    }

    #[test]
    fn test_style_defaults() {
        let style = ShapeStyle::default();
        assert_eq!(style.shadow_blur, 5.0);
        assert_eq!(style.shadow_offset, Vec2::ZERO);
        assert_eq!(style.line_join, LineJoin::Miter);
        assert_eq!(style.detection_mode, DetectionMode::Path);
        assert_eq!(style.resolved_stroke(), None);
    }

    #[test]
    fn test_stroke_defaults_fill_missing_half() {
        let color_only = ShapeStyle::new().with_stroke(Color::RED);
        assert_eq!(color_only.resolved_stroke(), Some((Color::RED, 2.0)));

        let width_only = ShapeStyle::new().with_stroke_width(6.0);
        assert_eq!(width_only.resolved_stroke(), Some((Color::BLACK, 6.0)));
    }
}
