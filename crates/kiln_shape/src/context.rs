//! Geometry callbacks and the context they draw through

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use kiln_paint::Surface;

use crate::error::DrawError;
use crate::resolve;
use crate::style::ShapeStyle;

/// Geometry callback of a shape
///
/// Builds the shape's path in local coordinates and paints it, usually with
/// [`ShapeContext::fill_stroke`].
pub type DrawFn = Arc<dyn Fn(&mut ShapeContext<'_>) -> Result<(), DrawError> + Send + Sync>;

/// The surface a shape is being drawn on, together with its style
///
/// Derefs to the surface, so every [`Surface`] and `SurfaceExt` method is
/// available directly. The composite transform, opacity and line join are
/// already applied when a callback receives it.
pub struct ShapeContext<'a> {
    surface: &'a mut dyn Surface,
    style: &'a ShapeStyle,
}

impl<'a> ShapeContext<'a> {
    pub fn new(surface: &'a mut dyn Surface, style: &'a ShapeStyle) -> Self {
        Self { surface, style }
    }

    pub fn style(&self) -> &ShapeStyle {
        self.style
    }

    /// Fill the current path with the shape's fill, including its shadow
    pub fn fill(&mut self) {
        resolve::fill_path(self.surface, self.style);
    }

    /// Stroke the current path with the shape's stroke
    pub fn stroke(&mut self) {
        resolve::stroke_path(self.surface, self.style);
    }

    /// Fill, then stroke
    pub fn fill_stroke(&mut self) {
        resolve::fill_stroke_path(self.surface, self.style);
    }
}

impl<'a> Deref for ShapeContext<'a> {
    type Target = dyn Surface + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.surface
    }
}

impl<'a> DerefMut for ShapeContext<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.surface
    }
}
