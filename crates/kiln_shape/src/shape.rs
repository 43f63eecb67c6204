//! Shapes
//!
//! A `Shape` is a drawable node: placement data, style attributes, an
//! optional geometry callback and an optional pixel snapshot. Setters are
//! plain storage; nothing is redrawn or re-cached when they change.

use std::fmt;
use std::sync::Arc;

use kiln_core::{Color, LineJoin, Vec2};

use crate::cache::PixelCache;
use crate::context::{DrawFn, ShapeContext};
use crate::error::DrawError;
use crate::geometry;
use crate::node::{Node, NodeCore};
use crate::style::{DetectionMode, Fill, ShapeStyle};

/// A drawable scene node
#[derive(Clone, Default)]
pub struct Shape {
    core: NodeCore,
    style: ShapeStyle,
    draw: Option<DrawFn>,
    cache: PixelCache,
}

impl Shape {
    /// Shape with default style and no geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned rectangle with its top-left corner at the origin
    pub fn rect(width: f32, height: f32) -> Self {
        Self::new().with_draw(geometry::rect(width, height))
    }

    /// Circle centered at the origin
    pub fn circle(radius: f32) -> Self {
        Self::new().with_draw(geometry::circle(radius))
    }

    /// Ellipse centered at the origin
    pub fn ellipse(radius_x: f32, radius_y: f32) -> Self {
        Self::new().with_draw(geometry::ellipse(radius_x, radius_y))
    }

    /// Regular polygon centered at the origin
    pub fn regular_polygon(sides: u32, radius: f32) -> Self {
        Self::new().with_draw(geometry::regular_polygon(sides, radius))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Geometry Callback
    // ─────────────────────────────────────────────────────────────────────────

    pub fn draw_fn(&self) -> Option<&DrawFn> {
        self.draw.as_ref()
    }

    pub fn has_draw_fn(&self) -> bool {
        self.draw.is_some()
    }

    /// Store the geometry callback
    pub fn set_draw_fn<F>(&mut self, f: F)
    where
        F: Fn(&mut ShapeContext<'_>) -> Result<(), DrawError> + Send + Sync + 'static,
    {
        self.draw = Some(Arc::new(f));
    }

    pub fn set_draw(&mut self, draw: DrawFn) {
        self.draw = Some(draw);
    }

    pub fn clear_draw_fn(&mut self) {
        self.draw = None;
    }

    pub fn with_draw(mut self, draw: DrawFn) -> Self {
        self.draw = Some(draw);
        self
    }

    pub fn with_draw_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ShapeContext<'_>) -> Result<(), DrawError> + Send + Sync + 'static,
    {
        self.set_draw_fn(f);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Style
    // ─────────────────────────────────────────────────────────────────────────

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn fill(&self) -> Option<&Fill> {
        self.style.fill.as_ref()
    }

    pub fn set_fill(&mut self, fill: Option<Fill>) {
        self.style.fill = fill;
    }

    pub fn stroke(&self) -> Option<Color> {
        self.style.stroke
    }

    pub fn set_stroke(&mut self, color: Option<Color>) {
        self.style.stroke = color;
    }

    pub fn stroke_width(&self) -> Option<f32> {
        self.style.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: Option<f32>) {
        self.style.stroke_width = width;
    }

    pub fn line_join(&self) -> LineJoin {
        self.style.line_join
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.style.line_join = join;
    }

    pub fn shadow_color(&self) -> Option<Color> {
        self.style.shadow_color
    }

    pub fn set_shadow_color(&mut self, color: Option<Color>) {
        self.style.shadow_color = color;
    }

    pub fn shadow_blur(&self) -> f32 {
        self.style.shadow_blur
    }

    pub fn set_shadow_blur(&mut self, blur: f32) {
        self.style.shadow_blur = blur;
    }

    pub fn shadow_offset(&self) -> Vec2 {
        self.style.shadow_offset
    }

    pub fn set_shadow_offset(&mut self, offset: Vec2) {
        self.style.shadow_offset = offset;
    }

    pub fn detection_mode(&self) -> DetectionMode {
        self.style.detection_mode
    }

    pub fn set_detection_mode(&mut self, mode: DetectionMode) {
        self.style.detection_mode = mode;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pixel Cache
    // ─────────────────────────────────────────────────────────────────────────

    pub fn pixel_cache(&self) -> &PixelCache {
        &self.cache
    }

    pub fn pixel_cache_mut(&mut self) -> &mut PixelCache {
        &mut self.cache
    }
}

impl Node for Shape {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("core", &self.core)
            .field("style", &self.style)
            .field("draw", &self.draw.as_ref().map(|_| "<fn>"))
            .field("cached", &self.cache.is_cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shape_has_defaults() {
        let shape = Shape::new();
        assert!(!shape.has_draw_fn());
        assert!(!shape.pixel_cache().is_cached());
        assert_eq!(shape.style(), &ShapeStyle::default());
    }

    #[test]
    fn test_setters_are_storage() {
        let mut shape = Shape::rect(10.0, 10.0);
        shape.set_fill(Some(Color::RED.into()));
        shape.set_stroke(Some(Color::BLUE));
        shape.set_stroke_width(Some(4.0));
        shape.set_line_join(LineJoin::Round);
        shape.set_shadow_color(Some(Color::BLACK));
        shape.set_shadow_blur(8.0);
        shape.set_shadow_offset(Vec2::new(1.0, 2.0));
        shape.set_detection_mode(DetectionMode::Pixel);

        assert_eq!(shape.fill(), Some(&Fill::Color(Color::RED)));
        assert_eq!(shape.stroke(), Some(Color::BLUE));
        assert_eq!(shape.stroke_width(), Some(4.0));
        assert_eq!(shape.line_join(), LineJoin::Round);
        assert_eq!(shape.shadow_color(), Some(Color::BLACK));
        assert_eq!(shape.shadow_blur(), 8.0);
        assert_eq!(shape.shadow_offset(), Vec2::new(1.0, 2.0));
        assert_eq!(shape.detection_mode(), DetectionMode::Pixel);
    }

    #[test]
    fn test_draw_fn_can_be_cleared() {
        let mut shape = Shape::new().with_draw_fn(|_ctx| Ok(()));
        assert!(shape.has_draw_fn());
        shape.clear_draw_fn();
        assert!(!shape.has_draw_fn());
    }

    #[test]
    fn test_debug_hides_callback() {
        let shape = Shape::circle(3.0).with_name("dot");
        let text = format!("{shape:?}");
        assert!(text.contains("<fn>"));
        assert!(text.contains("dot"));
    }
}
