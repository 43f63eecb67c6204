//! Kiln Core Types
//!
//! Foundational value types shared by every Kiln crate:
//!
//! - **Geometry**: points, vectors, sizes, rects and 2D affine transforms
//! - **Color**: straight-alpha RGBA colors
//! - **Paint**: gradients, image patterns, line joins and drop shadows
//! - **Path**: vector paths with non-zero winding containment
//! - **Image**: shared RGBA rasters used for patterns and pixel readback
//!
//! # Example
//!
//! ```rust
//! use kiln_core::{Affine2D, Path, Point, Rect};
//!
//! let path = Path::rect(Rect::new(0.0, 0.0, 100.0, 100.0))
//!     .transform(&Affine2D::translation(10.0, 10.0));
//!
//! assert!(path.contains(Point::new(60.0, 60.0)));
//! assert!(!path.contains(Point::new(5.0, 5.0)));
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod image;
pub mod paint;
pub mod path;

pub use color::Color;
pub use error::ImageError;
pub use geometry::{Affine2D, Point, Rect, Size, Vec2};
pub use image::Image;
pub use paint::{
    Gradient, GradientStop, GradientStops, LineJoin, Paint, Pattern, RepeatMode, Shadow,
};
pub use path::{arc_segments, Path, PathCommand};
