//! RGBA raster images
//!
//! `Image` is the single raster type in Kiln: pattern sources, surface
//! readbacks and cached hit-test snapshots are all images. Pixel data is
//! row-major, 4 bytes per pixel, straight (non-premultiplied) alpha, and is
//! shared behind an `Arc` so clones are cheap.

use std::sync::Arc;

use crate::color::Color;
use crate::error::{ImageError, Result};

/// Row-major straight-alpha RGBA pixels
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Image {
    /// Fully transparent image
    pub fn transparent(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let len = width as usize * height as usize * 4;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len].into(),
        })
    }

    /// Wrap existing RGBA data
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageError::DataLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data: data.into(),
        })
    }

    /// Image filled with a single color
    pub fn solid(width: u32, height: u32, color: Color) -> Result<Self> {
        check_dimensions(width, height)?;
        let pixel = color.to_rgba8();
        let data: Vec<u8> = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::from_rgba(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at (x, y), `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.data[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Number of pixels with non-zero alpha
    pub fn opaque_pixel_count(&self) -> usize {
        self.data.chunks_exact(4).filter(|p| p[3] != 0).count()
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        let err = Image::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            ImageError::DataLength {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_zero_dimensions_error() {
        assert!(Image::transparent(0, 4).is_err());
        assert!(Image::solid(4, 0, Color::RED).is_err());
    }

    #[test]
    fn test_solid_pixels() {
        let img = Image::solid(3, 2, Color::BLUE).unwrap();
        assert_eq!(img.pixel(2, 1), Some([0, 0, 255, 255]));
        assert_eq!(img.pixel(3, 0), None);
        assert_eq!(img.opaque_pixel_count(), 6);
    }
}
