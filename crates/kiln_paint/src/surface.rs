//! Surface - Canvas-Style Drawing API
//!
//! The `Surface` trait is the 2D drawing target shapes render onto. It keeps
//! the HTML canvas model: a current drawing state (transform, paints, line
//! settings, global alpha, shadow) with a save/restore stack, and a single
//! current path that `fill`, `stroke` and `is_point_in_path` operate on.
//!
//! # Example
//!
//! ```rust
//! use kiln_core::{Affine2D, Color};
//! use kiln_paint::{RecordingSurface, Surface, SurfaceExt};
//!
//! let mut surface = RecordingSurface::new(200, 200);
//! {
//!     let mut s = surface.saved();
//!     s.translate(50.0, 50.0);
//!     s.begin_path();
//!     s.rect(0.0, 0.0, 100.0, 100.0);
//!     s.set_fill_paint(Color::BLUE.into());
//!     s.fill();
//! }
//! assert!(surface.is_point_in_path(60.0, 60.0));
//! assert_eq!(surface.current_transform(), Affine2D::IDENTITY);
//! ```

use std::ops::{Deref, DerefMut};

use kiln_core::{Affine2D, Color, Image, LineJoin, Paint, Vec2};

use crate::error::Result;
use crate::state::DrawingState;

/// A 2D drawing target with canvas semantics
///
/// Object safe: renderers work with `&mut dyn Surface`.
pub trait Surface {
    /// Surface width and height in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Current drawing state
    fn drawing_state(&self) -> &DrawingState;

    /// Number of saved states not yet restored
    fn save_depth(&self) -> usize;

    // ─────────────────────────────────────────────────────────────────────────
    // State Stack
    // ─────────────────────────────────────────────────────────────────────────

    /// Push a copy of the drawing state
    fn save(&mut self);

    /// Pop the last saved drawing state
    fn restore(&mut self);

    /// Post-multiply the current transform by `m`
    fn transform(&mut self, m: &Affine2D);

    /// Replace the current transform
    fn set_transform(&mut self, m: Affine2D);

    fn current_transform(&self) -> Affine2D {
        self.drawing_state().transform
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Path Building (user space)
    // ─────────────────────────────────────────────────────────────────────────

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32);
    fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32);

    /// Circular arc; angles in radians measured from the positive x axis
    fn arc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    );

    /// Add a closed rectangle subpath
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn close_path(&mut self);

    // ─────────────────────────────────────────────────────────────────────────
    // Drawing State
    // ─────────────────────────────────────────────────────────────────────────

    fn set_fill_paint(&mut self, paint: Paint);
    fn set_stroke_paint(&mut self, paint: Paint);
    fn set_line_width(&mut self, width: f32);
    fn set_line_join(&mut self, join: LineJoin);

    /// Opacity multiplied into every subsequent paint operation
    fn set_global_alpha(&mut self, alpha: f32);

    fn set_shadow_color(&mut self, color: Color);
    fn set_shadow_blur(&mut self, blur: f32);

    /// Shadow offset in surface pixels, unaffected by the transform
    fn set_shadow_offset(&mut self, offset: Vec2);

    // ─────────────────────────────────────────────────────────────────────────
    // Painting
    // ─────────────────────────────────────────────────────────────────────────

    /// Fill the current path (non-zero winding)
    fn fill(&mut self);

    /// Stroke the current path
    fn stroke(&mut self);

    /// Whether a surface-space point lies inside the current path
    fn is_point_in_path(&self, x: f32, y: f32) -> bool;

    /// Erase all pixels and reset the drawing state, stack and path
    fn clear(&mut self);

    /// Straight-alpha RGBA copy of the surface pixels
    fn read_pixels(&self) -> Result<Image>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Extension Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Convenience methods available on every surface
pub trait SurfaceExt: Surface {
    fn translate(&mut self, x: f32, y: f32) {
        self.transform(&Affine2D::translation(x, y));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform(&Affine2D::scale(sx, sy));
    }

    fn rotate(&mut self, angle: f32) {
        self.transform(&Affine2D::rotation(angle));
    }

    /// Save now and restore when the returned guard drops
    fn saved(&mut self) -> SavedState<'_, Self> {
        self.save();
        SavedState { surface: self }
    }
}

impl<S: Surface + ?Sized> SurfaceExt for S {}

/// Guard from [`SurfaceExt::saved`]; restores the surface on drop,
/// including early returns and unwinding
pub struct SavedState<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<S: Surface + ?Sized> Deref for SavedState<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SavedState<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SavedState<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}
