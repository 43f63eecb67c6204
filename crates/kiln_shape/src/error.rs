//! Error types for kiln_shape

use kiln_paint::SurfaceError;
use thiserror::Error;

use crate::node::NodeId;

/// Errors from structural edits of the scene tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Handle does not refer to a live node
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Only groups can have children
    #[error("Node {0:?} cannot have children")]
    NotAContainer(NodeId),

    /// Attaching would make a node its own ancestor
    #[error("Attaching {child:?} to {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// Errors creating a stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// Scratch surfaces could not be allocated
    #[error("Scratch surface allocation failed: {0}")]
    Surface(#[from] SurfaceError),
}

/// Failure reported by a geometry callback
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// The callback gave up with a message
    #[error("Draw failed: {0}")]
    Failed(String),

    /// A surface operation inside the callback failed
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

impl DrawError {
    pub fn failed(message: impl Into<String>) -> Self {
        DrawError::Failed(message.into())
    }
}

/// Errors from rendering or snapshotting a shape
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The shape's geometry callback failed; surface state was restored
    #[error("Geometry callback of {node:?} failed: {source}")]
    Draw {
        node: NodeId,
        #[source]
        source: DrawError,
    },

    /// Reading back the snapshot surface failed
    #[error("Snapshot readback failed: {0}")]
    Surface(#[from] SurfaceError),
}

/// Result type for scene tree operations
pub type Result<T> = std::result::Result<T, SceneError>;
