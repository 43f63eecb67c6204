//! Error types for kiln_core

use thiserror::Error;

/// Errors that can occur when constructing an [`Image`](crate::Image)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Width or height is zero
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length does not match `width * height * 4`
    #[error("RGBA data length {actual} does not match {width}x{height} (expected {expected})")]
    DataLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Result type for kiln_core operations
pub type Result<T> = std::result::Result<T, ImageError>;
