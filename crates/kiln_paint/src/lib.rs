//! Kiln Paint
//!
//! Drawing surfaces with HTML-canvas semantics.
//!
//! - [`Surface`]: the object-safe drawing API shapes render onto
//! - [`RasterSurface`]: CPU rasterization into an RGBA pixmap (tiny-skia)
//! - [`RecordingSurface`]: records every call for inspection
//! - [`CanvasState`]: the shared state machine behind both
//!
//! # Example
//!
//! ```rust
//! use kiln_core::Color;
//! use kiln_paint::{RasterSurface, Surface};
//!
//! let mut surface = RasterSurface::new(64, 64).unwrap();
//! surface.begin_path();
//! surface.rect(8.0, 8.0, 16.0, 16.0);
//! surface.set_fill_paint(Color::RED.into());
//! surface.fill();
//!
//! let image = surface.read_pixels().unwrap();
//! assert_eq!(image.pixel(12, 12), Some([255, 0, 0, 255]));
//! ```

pub mod error;
pub mod raster;
pub mod recording;
mod shadow;
pub mod state;
pub mod surface;

pub use error::{Result, SurfaceError};
pub use raster::{RasterSurface, MAX_DIMENSION};
pub use recording::{PaintCall, RecordingSurface, SurfaceOp};
pub use state::{CanvasState, DrawingState};
pub use surface::{SavedState, Surface, SurfaceExt};
