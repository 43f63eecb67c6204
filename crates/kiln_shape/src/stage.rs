//! Stage
//!
//! The stage owns the scene tree, its declared size and the two scratch
//! surfaces hit testing needs: a path probe for path-mode queries and a
//! full-size raster for pixel snapshots. Both scratch surfaces are borrowed
//! exclusively for the duration of one call.

use kiln_core::Point;
use kiln_paint::{RasterSurface, RecordingSurface, Surface};

use crate::cache::snapshot_shape;
use crate::error::{RenderError, StageError};
use crate::hit::hit_test;
use crate::node::NodeId;
use crate::render::render_shape;
use crate::tree::SceneTree;

/// Stage configuration
#[derive(Clone, Debug, PartialEq)]
pub struct StageConfig {
    /// Declared width in pixels
    pub width: u32,
    /// Declared height in pixels
    pub height: u32,
    /// Anti-alias pixel snapshots
    pub anti_alias: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            anti_alias: true,
        }
    }
}

impl StageConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }
}

/// Scene tree plus rendering and hit-testing entry points
#[derive(Debug)]
pub struct Stage {
    config: StageConfig,
    tree: SceneTree,
    path_probe: RecordingSurface,
    pixel_scratch: RasterSurface,
}

impl Stage {
    pub fn new(config: StageConfig) -> Result<Self, StageError> {
        let pixel_scratch = RasterSurface::new(config.width, config.height)?
            .with_anti_alias(config.anti_alias);
        let path_probe = RecordingSurface::new(config.width, config.height);
        tracing::debug!(
            width = config.width,
            height = config.height,
            "stage created"
        );
        Ok(Self {
            config,
            tree: SceneTree::new(),
            path_probe,
            pixel_scratch,
        })
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Draw one shape onto `target`; nothing happens without a target
    pub fn render(&self, id: NodeId, target: Option<&mut dyn Surface>) -> Result<(), RenderError> {
        let Some(surface) = target else {
            return Ok(());
        };
        render_shape(&self.tree, id, surface)
    }

    /// Whether `point` (surface space) lies inside the shape
    pub fn intersects(&mut self, id: NodeId, point: Point) -> bool {
        hit_test(&self.tree, &mut self.path_probe, id, point)
    }

    /// Render the shape alone into the pixel scratch and cache the result
    ///
    /// Stale handles and groups are ignored.
    pub fn snapshot(&mut self, id: NodeId) -> Result<(), RenderError> {
        if self.tree.shape(id).is_none() {
            return Ok(());
        }
        let image = snapshot_shape(&self.tree, &mut self.pixel_scratch, id)?;
        tracing::debug!(?id, opaque = image.opaque_pixel_count(), "pixel cache stored");
        if let Some(shape) = self.tree.shape_mut(id) {
            shape.pixel_cache_mut().store(image);
        }
        Ok(())
    }

    /// Drop the shape's cached snapshot
    pub fn invalidate(&mut self, id: NodeId) {
        if let Some(shape) = self.tree.shape_mut(id) {
            shape.pixel_cache_mut().invalidate();
            tracing::debug!(?id, "pixel cache invalidated");
        }
    }
}
