//! Paint values
//!
//! What a surface paints with: solid colors, two-stop-or-more gradients and
//! repeating image patterns, plus the line-join and drop-shadow settings that
//! travel with the drawing state.

use smallvec::SmallVec;

use crate::color::Color;
use crate::geometry::{Point, Vec2};
use crate::image::Image;

// ─────────────────────────────────────────────────────────────────────────────
// Stroke Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Line join style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    /// Miter join (sharp corner)
    #[default]
    Miter,
    /// Round join
    Round,
    /// Bevel join (flat corner)
    Bevel,
}

// ─────────────────────────────────────────────────────────────────────────────
// Gradients
// ─────────────────────────────────────────────────────────────────────────────

/// Gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f32,
    /// Color at this stop
    pub color: Color,
}

impl GradientStop {
    /// Create a new gradient stop
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Color stops, inline for the common two-stop case
pub type GradientStops = SmallVec<[GradientStop; 2]>;

/// Gradient geometry plus color stops
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    /// Linear gradient between two points
    Linear {
        start: Point,
        end: Point,
        stops: GradientStops,
    },
    /// Radial gradient between two circles
    Radial {
        start: Point,
        start_radius: f32,
        end: Point,
        end_radius: f32,
        stops: GradientStops,
    },
}

impl Gradient {
    /// Linear gradient with no stops yet
    pub fn linear(start: Point, end: Point) -> Self {
        Gradient::Linear {
            start,
            end,
            stops: GradientStops::new(),
        }
    }

    /// Radial gradient with no stops yet
    pub fn radial(start: Point, start_radius: f32, end: Point, end_radius: f32) -> Self {
        Gradient::Radial {
            start,
            start_radius,
            end,
            end_radius,
            stops: GradientStops::new(),
        }
    }

    /// Append a color stop, keeping stops ordered by offset
    pub fn add_color_stop(&mut self, offset: f32, color: Color) {
        let stop = GradientStop::new(offset, color);
        let stops = self.stops_mut();
        let at = stops
            .iter()
            .position(|s| s.offset > stop.offset)
            .unwrap_or(stops.len());
        stops.insert(at, stop);
    }

    /// Builder form of [`Gradient::add_color_stop`]
    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        self.add_color_stop(offset, color);
        self
    }

    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear { stops, .. } | Gradient::Radial { stops, .. } => stops,
        }
    }

    fn stops_mut(&mut self) -> &mut GradientStops {
        match self {
            Gradient::Linear { stops, .. } | Gradient::Radial { stops, .. } => stops,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// How a pattern image tiles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

impl RepeatMode {
    pub fn repeats_x(self) -> bool {
        matches!(self, RepeatMode::Repeat | RepeatMode::RepeatX)
    }

    pub fn repeats_y(self) -> bool {
        matches!(self, RepeatMode::Repeat | RepeatMode::RepeatY)
    }
}

/// Image pattern anchored at the user-space origin
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub image: Image,
    pub repeat: RepeatMode,
}

impl Pattern {
    pub fn new(image: Image, repeat: RepeatMode) -> Self {
        Self { image, repeat }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Paint
// ─────────────────────────────────────────────────────────────────────────────

/// Fill or stroke style of a surface
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Gradient(Gradient),
    Pattern(Pattern),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Paint::Gradient(gradient)
    }
}

impl From<Pattern> for Paint {
    fn from(pattern: Pattern) -> Self {
        Paint::Pattern(pattern)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shadow
// ─────────────────────────────────────────────────────────────────────────────

/// Drop shadow applied to subsequent paint operations
///
/// Offsets are in surface space and are not affected by the current
/// transform. The default shadow is transparent and therefore invisible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset: Vec2,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::TRANSPARENT,
            blur: 0.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Shadow {
    pub fn new(color: Color, blur: f32, offset: Vec2) -> Self {
        Self {
            color,
            blur,
            offset,
        }
    }

    /// Whether painting with this shadow produces any shadow pixels
    pub fn is_visible(&self) -> bool {
        !self.color.is_transparent() && (self.blur > 0.0 || !self.offset.is_zero())
    }
}
