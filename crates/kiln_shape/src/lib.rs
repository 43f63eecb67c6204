//! Kiln Shapes
//!
//! Scene nodes that draw themselves onto a [`Surface`](kiln_paint::Surface)
//! and answer "is this point inside me?".
//!
//! # Architecture
//!
//! ```text
//! SceneTree (slotmap)          Stage
//!   Group ── Group ── Shape      ├── render(shape, surface)
//!              │                 ├── intersects(shape, point)
//!              └── Shape         └── snapshot / invalidate
//!
//! render:  compose_transform ─► save ─► transform, alpha, join
//!                              ─► geometry callback ─► fill / stroke ─► restore
//! ```
//!
//! - **Transform composition**: root-first product of each node's
//!   translate·rotate·scale, corrected by its center offset
//! - **Style resolution**: a fill is classified into solid, pattern, linear
//!   gradient, radial gradient or fallback, and painted with its shadow kept
//!   off the stroke
//! - **Hit testing**: path containment against a probe surface, or alpha
//!   lookup in a cached snapshot
//!
//! # Example
//!
//! ```rust
//! use kiln_core::{Color, Point};
//! use kiln_shape::{Node, Shape, Stage, StageConfig};
//!
//! let mut stage = Stage::new(StageConfig::new(200, 200)).unwrap();
//! let mut square = Shape::rect(50.0, 50.0).with_position(20.0, 20.0);
//! square.set_fill(Some(Color::RED.into()));
//! let id = stage.tree_mut().insert_shape(square);
//!
//! assert!(stage.intersects(id, Point::new(40.0, 40.0)));
//! assert!(!stage.intersects(id, Point::new(10.0, 10.0)));
//! ```

pub mod cache;
pub mod context;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod node;
pub mod render;
pub mod resolve;
pub mod shape;
pub mod stage;
pub mod style;
pub mod transform;
pub mod tree;

pub use cache::{snapshot_shape, PixelCache};
pub use context::{DrawFn, ShapeContext};
pub use error::{DrawError, RenderError, Result, SceneError, StageError};
pub use hit::{hit_test, path_hit, pixel_hit};
pub use node::{Group, Node, NodeCore, NodeId, SceneNode};
pub use render::render_shape;
pub use shape::Shape;
pub use stage::{Stage, StageConfig};
pub use style::{
    DetectionMode, Fill, FillDescriptor, GradientPoint, ResolvedFill, ShapeStyle,
    DEFAULT_SHADOW_BLUR, DEFAULT_STROKE_WIDTH,
};
pub use transform::{compose_transform, node_transform};
pub use tree::{AncestorChain, SceneTree};
