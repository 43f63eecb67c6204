//! Pixel cache
//!
//! A shape's cached RGBA snapshot, used by pixel-mode hit testing. The cache
//! is filled and dropped only on explicit request; changing a shape does not
//! invalidate it.

use kiln_core::{Image, Point};
use kiln_paint::Surface;

use crate::error::RenderError;
use crate::node::NodeId;
use crate::render::render_shape;
use crate::tree::SceneTree;

/// Optional snapshot of a shape rendered alone
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelCache {
    image: Option<Image>,
}

impl PixelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn is_cached(&self) -> bool {
        self.image.is_some()
    }

    pub fn store(&mut self, image: Image) {
        self.image = Some(image);
    }

    pub fn invalidate(&mut self) {
        self.image = None;
    }

    /// Whether the cached pixel under `point` has non-zero alpha
    ///
    /// The alpha byte is found at `((width * y) + x) * 4 + 3` using the
    /// floored coordinates, so an `x` past the row end reads from the next
    /// row. Empty caches, non-finite or negative coordinates, and points
    /// whose index overflows or lands past the buffer answer `false`.
    pub fn hit(&self, point: Point) -> bool {
        let Some(image) = &self.image else {
            return false;
        };
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return false;
        }
        alpha_index(image.width(), point)
            .and_then(|i| image.data().get(i))
            .is_some_and(|&alpha| alpha != 0)
    }
}

/// Byte offset of the alpha channel under a non-negative point
fn alpha_index(width: u32, point: Point) -> Option<usize> {
    let x = usize::try_from(point.x.floor() as u64).ok()?;
    let y = usize::try_from(point.y.floor() as u64).ok()?;
    (width as usize)
        .checked_mul(y)?
        .checked_add(x)?
        .checked_mul(4)?
        .checked_add(3)
}

/// Render one shape alone into a cleared scratch surface and read it back
///
/// The shape is drawn at its true position in the transform chain.
pub fn snapshot_shape(
    tree: &SceneTree,
    scratch: &mut dyn Surface,
    id: NodeId,
) -> Result<Image, RenderError> {
    scratch.clear();
    render_shape(tree, id, scratch)?;
    Ok(scratch.read_pixels()?)
}
