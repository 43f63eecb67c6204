//! Style resolution
//!
//! Turns a [`ShapeStyle`] into surface calls on the current path. The
//! sequence is fixed:
//!
//! - with a fill: `save`, shadow, fill, `restore`, then the stroke, so the
//!   shadow never reaches the stroke
//! - without a fill: shadow, then the stroke
//!
//! Fill is always issued before stroke.

use kiln_core::Paint;
use kiln_paint::{Surface, SurfaceExt};

use crate::style::{ResolvedFill, ShapeStyle};

/// Configure the surface shadow from the style, if a shadow color is set
pub fn apply_shadow(surface: &mut dyn Surface, style: &ShapeStyle) {
    let Some(color) = style.shadow_color else {
        return;
    };
    surface.set_shadow_color(color);
    surface.set_shadow_blur(style.shadow_blur);
    surface.set_shadow_offset(style.shadow_offset);
}

/// Fill the current path with a resolved paint
///
/// Pattern offsets translate the surface for the fill only.
pub fn fill_resolved(surface: &mut dyn Surface, fill: &ResolvedFill) {
    if fill.is_fallback() {
        tracing::debug!("unrecognised fill, painting black");
    }

    match fill {
        ResolvedFill::Pattern {
            pattern,
            offset: Some(offset),
        } => {
            let mut s = surface.saved();
            s.translate(offset.x, offset.y);
            s.set_fill_paint(Paint::Pattern(pattern.clone()));
            s.fill();
        }
        _ => {
            surface.set_fill_paint(fill.paint());
            surface.fill();
        }
    }
}

/// Fill pass: shadow and fill inside a save/restore scope
pub fn fill_path(surface: &mut dyn Surface, style: &ShapeStyle) {
    let Some(fill) = &style.fill else {
        return;
    };
    let resolved = fill.classify();

    let mut s = surface.saved();
    apply_shadow(&mut *s, style);
    fill_resolved(&mut *s, &resolved);
}

/// Stroke pass; carries the shadow only when the style has no fill
pub fn stroke_path(surface: &mut dyn Surface, style: &ShapeStyle) {
    let Some((color, width)) = style.resolved_stroke() else {
        return;
    };
    if style.fill.is_none() {
        apply_shadow(surface, style);
    }
    surface.set_line_width(width);
    surface.set_stroke_paint(Paint::Solid(color));
    surface.stroke();
}

/// Fill then stroke the current path
pub fn fill_stroke_path(surface: &mut dyn Surface, style: &ShapeStyle) {
    fill_path(surface, style);
    stroke_path(surface, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Fill, FillDescriptor};
    use kiln_core::{Color, Image, Shadow, Vec2};
    use kiln_paint::{RecordingSurface, SurfaceOp};

    fn surface_with_rect() -> RecordingSurface {
        let mut s = RecordingSurface::new(100, 100);
        s.rect(0.0, 0.0, 10.0, 10.0);
        s.take_ops();
        s
    }

    #[test]
    fn test_fill_present_shadow_stays_on_fill() {
        let style = ShapeStyle::new()
            .with_fill(Color::RED)
            .with_stroke(Color::BLUE)
            .with_shadow(Color::BLACK, 4.0, Vec2::new(2.0, 2.0));
        let mut s = surface_with_rect();
        fill_stroke_path(&mut s, &style);

        assert_eq!(
            s.op_names(),
            vec![
                "save",
                "set_shadow_color",
                "set_shadow_blur",
                "set_shadow_offset",
                "set_fill_paint",
                "fill",
                "restore",
                "set_line_width",
                "set_stroke_paint",
                "stroke",
            ]
        );

        let fill = s.fills().next().unwrap();
        assert_eq!(
            fill.state.shadow,
            Shadow::new(Color::BLACK, 4.0, Vec2::new(2.0, 2.0))
        );
        let stroke = s.strokes().next().unwrap();
        assert!(!stroke.state.shadow.is_visible());
        assert_eq!(stroke.state.line_width, 2.0);
    }

    #[test]
    fn test_fill_absent_shadow_goes_to_stroke() {
        let style = ShapeStyle::new()
            .with_stroke_width(3.0)
            .with_shadow(Color::BLACK, 4.0, Vec2::ZERO);
        let mut s = surface_with_rect();
        fill_stroke_path(&mut s, &style);

        assert_eq!(s.fills().count(), 0);
        let stroke = s.strokes().next().unwrap();
        assert!(stroke.state.shadow.is_visible());
        assert_eq!(stroke.state.stroke, Paint::Solid(Color::BLACK));
        assert_eq!(stroke.state.line_width, 3.0);
    }

    #[test]
    fn test_no_stroke_without_color_or_width() {
        let style = ShapeStyle::new().with_fill(Color::RED);
        let mut s = surface_with_rect();
        fill_stroke_path(&mut s, &style);
        assert_eq!(s.strokes().count(), 0);
        assert_eq!(s.fills().count(), 1);
    }

    #[test]
    fn test_pattern_offset_is_scoped() {
        let image = Image::solid(2, 2, Color::RED).unwrap();
        let style = ShapeStyle::new().with_fill(Fill::Descriptor(
            FillDescriptor::new().with_image(image).with_offset(5.0, 6.0),
        ));
        let mut s = surface_with_rect();
        fill_path(&mut s, &style);

        let fill = s.fills().next().unwrap();
        assert_eq!(
            fill.state.transform,
            kiln_core::Affine2D::translation(5.0, 6.0)
        );
        assert_eq!(s.save_depth(), 0);
        assert!(s.current_transform().is_identity());
        assert!(s
            .ops()
            .iter()
            .any(|op| matches!(op, SurfaceOp::Transform(_))));
    }

    #[test]
    fn test_fallback_fills_black() {
        let style = ShapeStyle::new().with_fill(Fill::Descriptor(FillDescriptor::new()));
        let mut s = surface_with_rect();
        fill_path(&mut s, &style);
        assert_eq!(
            s.fills().next().unwrap().state.fill,
            Paint::Solid(Color::BLACK)
        );
    }
}
