//! Transform composition
//!
//! The composite transform of a shape maps its local geometry to surface
//! space. It is the product, root first, of every node's own transform on
//! the chain from the root to the shape. A node with a center offset has a
//! translation by the negated offset applied before its own transform.

use kiln_core::Affine2D;

use crate::node::{Node, NodeCore, NodeId};
use crate::tree::SceneTree;

/// A node's own transform including its center-offset correction
pub fn node_transform(core: &NodeCore) -> Affine2D {
    let local = core.local_transform();
    let offset = core.center_offset();
    if offset.is_zero() {
        local
    } else {
        local.then(&Affine2D::translation(-offset.x, -offset.y))
    }
}

/// Local-to-surface transform of a node; identity for stale handles
pub fn compose_transform(tree: &SceneTree, id: NodeId) -> Affine2D {
    tree.ancestors(id)
        .iter()
        .filter_map(|&n| tree.get(n))
        .fold(Affine2D::IDENTITY, |composite, node| {
            composite.then(&node_transform(node.core()))
        })
}
