//! Surface error types

use kiln_core::ImageError;
use thiserror::Error;

/// Errors that can occur when creating or reading a drawing surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Width or height is zero or above the supported maximum
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel readback produced an unusable buffer
    #[error("Pixel readback failed: {0}")]
    Readback(#[from] ImageError),
}

/// Result type for kiln_paint operations
pub type Result<T> = std::result::Result<T, SurfaceError>;
